//! Frame advance
//!
//! One call per rendering frame. The countdown, spawner, integrator, and
//! reaper only run while the session is active; splatter expiry runs in
//! every phase so leftovers fade out on the end screen too. All timers live
//! inside the session, so `start()` resets them and nothing scheduled in one
//! session can fire into the next.

use super::state::{GamePhase, SessionState};
use super::{motion, spawn};
use crate::consts::*;

/// Advance the session by `dt` seconds
pub fn advance(state: &mut SessionState, dt: f32) {
    state.elapsed += dt;

    if state.phase == GamePhase::Playing {
        // Countdown: one decrement per accumulated second
        state.clock_acc += dt;
        while state.clock_acc >= 1.0 && state.time_left > 0 {
            state.clock_acc -= 1.0;
            state.time_left -= 1;
        }
        if state.time_left == 0 {
            state.phase = GamePhase::Finished;
            log::info!("time up, final score {}", state.score);
        }
    }

    if state.phase == GamePhase::Playing {
        // Spawner: catch up on every delay that elapsed this frame
        state.spawn_in -= dt;
        while state.spawn_in <= 0.0 {
            spawn::spawn_fly(state);
            state.spawn_in += spawn::roll_spawn_delay(&mut state.rng);
        }

        motion::integrate(state, dt);

        // Reaper: TTL keyed off each fly's own spawn time. `retain` walks in
        // spawn order, so flies that are due together leave oldest first,
        // and a fly already smashed is simply absent.
        let now = state.elapsed;
        state.flies.retain(|f| now - f.spawned_at < FLY_TTL_SECS);
    }

    let now = state.elapsed;
    state.splatters.retain(|s| now - s.created_at < SPLATTER_SECS);
}
