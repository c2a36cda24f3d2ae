//! Session state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the player to start
    Idle,
    /// Countdown running, flies spawning
    Playing,
    /// Countdown reached zero, final score displayed
    Finished,
}

/// A fly entity
#[derive(Debug, Clone)]
pub struct Fly {
    pub id: u32,
    /// Position in percent of play-area width/height
    pub pos: Vec2,
    /// Velocity in percent per second, per-axis magnitude capped
    pub vel: Vec2,
    /// Render size in px, fixed at spawn, irrelevant to physics
    pub size: f32,
    /// Session-clock seconds at spawn, governs TTL
    pub spawned_at: f32,
}

/// A splatter left behind by a smashed fly
#[derive(Debug, Clone)]
pub struct Splatter {
    pub id: u32,
    pub pos: Vec2,
    pub created_at: f32,
}

/// Complete session state
///
/// Every timer (countdown accumulator, spawn delay, TTL baselines) lives in
/// here, so `start()` resetting the struct cancels anything the previous
/// session had pending.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Injected random source; tests pass a fixed seed
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Score, +HIT_SCORE per smash
    pub score: u32,
    /// Countdown seconds remaining
    pub time_left: u32,
    /// Live flies, in spawn (id) order
    pub flies: Vec<Fly>,
    /// Live splatters, in creation order
    pub splatters: Vec<Splatter>,
    /// Session clock in seconds, advances every frame
    pub elapsed: f32,
    /// Sub-second accumulator for the one-per-second countdown
    pub(crate) clock_acc: f32,
    /// Seconds until the next fly spawns
    pub(crate) spawn_in: f32,
    next_fly_id: u32,
    next_splatter_id: u32,
}

impl SessionState {
    /// Create an idle session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            time_left: SESSION_SECS,
            flies: Vec::new(),
            splatters: Vec::new(),
            elapsed: 0.0,
            clock_acc: 0.0,
            spawn_in: 0.0,
            next_fly_id: 1,
            next_splatter_id: 1,
        }
    }

    /// Allocate the next fly id
    pub fn alloc_fly_id(&mut self) -> u32 {
        let id = self.next_fly_id;
        self.next_fly_id += 1;
        id
    }

    /// Allocate the next splatter id
    pub fn alloc_splatter_id(&mut self) -> u32 {
        let id = self.next_splatter_id;
        self.next_splatter_id += 1;
        id
    }

    /// Begin a fresh session: full clear, countdown armed, first spawn rolled
    pub fn start(&mut self) {
        self.clear();
        self.spawn_in = super::spawn::roll_spawn_delay(&mut self.rng);
        self.phase = GamePhase::Playing;
        log::info!("session started ({}s on the clock)", self.time_left);
    }

    /// Return to the idle screen: same clearing as `start()`, countdown off
    pub fn reset(&mut self) {
        self.clear();
        self.phase = GamePhase::Idle;
    }

    /// Smash the fly with the given id.
    ///
    /// Removes it, scores it, and leaves a splatter at its last integrated
    /// position. Returns false with no state change when the id is stale
    /// (already smashed or reaped) or the session is not active.
    pub fn smash(&mut self, id: u32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(idx) = self.flies.iter().position(|f| f.id == id) else {
            return false;
        };
        let fly = self.flies.remove(idx);
        self.score += HIT_SCORE;
        let splat_id = self.alloc_splatter_id();
        self.splatters.push(Splatter {
            id: splat_id,
            pos: fly.pos,
            created_at: self.elapsed,
        });
        log::debug!("smashed fly {} at ({:.1}, {:.1})", id, fly.pos.x, fly.pos.y);
        true
    }

    /// Flies smashed so far, derived from the score
    pub fn flies_smashed(&self) -> u32 {
        self.score / HIT_SCORE
    }

    fn clear(&mut self) {
        self.score = 0;
        self.time_left = SESSION_SECS;
        self.flies.clear();
        self.splatters.clear();
        self.elapsed = 0.0;
        self.clock_acc = 0.0;
        self.spawn_in = 0.0;
        self.next_fly_id = 1;
        self.next_splatter_id = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::spawn_fly;

    #[test]
    fn test_start_resets_everything_together() {
        let mut state = SessionState::new(7);
        state.start();
        spawn_fly(&mut state);
        let id = state.flies[0].id;
        assert!(state.smash(id));
        assert_eq!(state.score, HIT_SCORE);

        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, SESSION_SECS);
        assert!(state.flies.is_empty());
        assert!(state.splatters.is_empty());
        // Id counters resume from 1
        spawn_fly(&mut state);
        assert_eq!(state.flies[0].id, 1);
    }

    #[test]
    fn test_reset_goes_idle_with_same_clearing() {
        let mut state = SessionState::new(7);
        state.start();
        spawn_fly(&mut state);
        state.reset();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, SESSION_SECS);
        assert!(state.flies.is_empty());
        assert!(state.splatters.is_empty());
    }

    #[test]
    fn test_smash_scores_and_leaves_splatter() {
        let mut state = SessionState::new(42);
        state.start();
        spawn_fly(&mut state);
        let fly = state.flies[0].clone();

        assert!(state.smash(fly.id));
        assert_eq!(state.score, HIT_SCORE);
        assert!(state.flies.is_empty());
        assert_eq!(state.splatters.len(), 1);
        assert_eq!(state.splatters[0].pos, fly.pos);
        assert_eq!(state.splatters[0].id, 1);
    }

    #[test]
    fn test_smash_is_idempotent() {
        let mut state = SessionState::new(42);
        state.start();
        spawn_fly(&mut state);
        let id = state.flies[0].id;

        assert!(state.smash(id));
        assert!(!state.smash(id));
        assert_eq!(state.score, HIT_SCORE);
        assert_eq!(state.splatters.len(), 1);
    }

    #[test]
    fn test_smash_unknown_id_is_noop() {
        let mut state = SessionState::new(42);
        state.start();
        assert!(!state.smash(999));
        assert_eq!(state.score, 0);
        assert!(state.splatters.is_empty());
    }

    #[test]
    fn test_smash_ignored_outside_active_session() {
        let mut state = SessionState::new(42);
        state.start();
        spawn_fly(&mut state);
        let id = state.flies[0].id;
        state.phase = GamePhase::Finished;

        assert!(!state.smash(id));
        assert_eq!(state.score, 0);
        assert_eq!(state.flies.len(), 1);
    }

    #[test]
    fn test_score_is_hits_times_increment() {
        let mut state = SessionState::new(123);
        state.start();
        for _ in 0..7 {
            spawn_fly(&mut state);
        }
        let ids: Vec<u32> = state.flies.iter().map(|f| f.id).collect();
        for id in ids {
            assert!(state.smash(id));
        }
        assert_eq!(state.score, 7 * HIT_SCORE);
        assert_eq!(state.flies_smashed(), 7);
    }
}
