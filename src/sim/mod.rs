//! Deterministic session simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Driven by an external frame loop through `advance`
//! - No rendering or platform dependencies

pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use state::{Fly, GamePhase, SessionState, Splatter};
pub use tick::advance;
