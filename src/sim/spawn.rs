//! Fly spawning
//!
//! While a session is active, flies appear after randomized delays drawn
//! uniformly from the configured interval. Position, size, and velocity are
//! all drawn from the session RNG so a seeded run is reproducible.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Fly, SessionState};
use crate::consts::*;

/// Draw the delay until the next spawn (seconds)
pub fn roll_spawn_delay(rng: &mut Pcg32) -> f32 {
    rng.random_range(SPAWN_DELAY_MIN..=SPAWN_DELAY_MAX)
}

/// Build a fly with randomized position, size, and velocity.
///
/// The position is drawn inside the inset bounds so a fresh fly never sits
/// on the play-area edge or under the HUD.
pub fn make_fly(id: u32, rng: &mut Pcg32, now: f32) -> Fly {
    let pos = Vec2::new(
        rng.random_range(BOUNDS_X_MIN..=BOUNDS_X_MAX),
        rng.random_range(BOUNDS_Y_MIN..=BOUNDS_Y_MAX),
    );
    let vel = Vec2::new(
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
    ) * FLY_SPEED_SCALE;
    let size = rng.random_range(FLY_SIZE_MIN..=FLY_SIZE_MAX);

    Fly {
        id,
        pos,
        vel,
        size,
        spawned_at: now,
    }
}

/// Spawn one fly into the session
pub fn spawn_fly(state: &mut SessionState) {
    let id = state.alloc_fly_id();
    let now = state.elapsed;
    let fly = make_fly(id, &mut state.rng, now);
    log::debug!("fly {} spawned at ({:.1}, {:.1})", id, fly.pos.x, fly.pos.y);
    state.flies.push(fly);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_delay_within_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            let delay = roll_spawn_delay(&mut rng);
            assert!((SPAWN_DELAY_MIN..=SPAWN_DELAY_MAX).contains(&delay));
        }
    }

    #[test]
    fn test_flies_spawn_inside_inset_bounds() {
        let mut rng = Pcg32::seed_from_u64(2);
        for i in 0..1000 {
            let fly = make_fly(i, &mut rng, 0.0);
            assert!((BOUNDS_X_MIN..=BOUNDS_X_MAX).contains(&fly.pos.x));
            assert!((BOUNDS_Y_MIN..=BOUNDS_Y_MAX).contains(&fly.pos.y));
            assert!((FLY_SIZE_MIN..=FLY_SIZE_MAX).contains(&fly.size));
            assert!(fly.vel.x.abs() <= FLY_SPEED_SCALE);
            assert!(fly.vel.y.abs() <= FLY_SPEED_SCALE);
        }
    }

    #[test]
    fn test_spawned_ids_are_sequential() {
        let mut state = SessionState::new(3);
        state.start();
        for _ in 0..5 {
            spawn_fly(&mut state);
        }
        let ids: Vec<u32> = state.flies.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
