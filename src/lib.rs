//! Fly Smasher - a reflex mini-game for wallet-connected mini-app frames
//!
//! Core modules:
//! - `sim`: Deterministic session simulation (spawning, motion, scoring)
//! - `frame`: Host frame boundary (auth, cast sharing, simulated mint)
//! - `audio`: Procedural sound effects via Web Audio
//! - `haptics`: Vibration feedback
//! - `settings`: User preferences

pub mod audio;
pub mod frame;
pub mod haptics;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Session length in seconds
    pub const SESSION_SECS: u32 = 60;
    /// Points awarded per smashed fly
    pub const HIT_SCORE: u32 = 10;

    /// Maximum fly lifespan before automatic removal (seconds)
    pub const FLY_TTL_SECS: f32 = 5.0;
    /// How long a splatter stays on screen (seconds)
    pub const SPLATTER_SECS: f32 = 3.0;

    /// Spawn delay range (seconds, uniform)
    pub const SPAWN_DELAY_MIN: f32 = 0.4;
    pub const SPAWN_DELAY_MAX: f32 = 1.2;

    /// Inset bounds of the play area, in percent of width/height.
    /// Keeps flies clear of the HUD at the top and the edges.
    pub const BOUNDS_X_MIN: f32 = 10.0;
    pub const BOUNDS_X_MAX: f32 = 90.0;
    pub const BOUNDS_Y_MIN: f32 = 15.0;
    pub const BOUNDS_Y_MAX: f32 = 85.0;

    /// Fly render size range (px, uniform at spawn)
    pub const FLY_SIZE_MIN: f32 = 15.0;
    pub const FLY_SIZE_MAX: f32 = 35.0;

    /// Initial velocity scale: components drawn in [-1,1] times this (%/s)
    pub const FLY_SPEED_SCALE: f32 = 12.0;
    /// Per-axis velocity magnitude cap (%/s)
    pub const FLY_MAX_AXIS_SPEED: f32 = 20.0;
    /// Per-step velocity perturbation range (%/s, uniform symmetric)
    pub const FLY_JITTER: f32 = 1.2;

    /// Countdown seconds that get a warning beep
    pub const BEEP_FINAL_SECS: u32 = 5;

    /// Simulated mint confirmation delay (milliseconds)
    pub const MINT_DELAY_MS: f64 = 2000.0;
}
