//! Refresh controller
//!
//! Owns the refresh cadence, the countdown clock, access gating and the
//! atomic commit of both feeds into the shared view-state.

pub mod core;
pub mod refresh;
pub mod state;
pub mod timers;

pub use refresh::{ControllerConfig, ControllerHandle, spawn_controller};
pub use state::{RefreshPhase, RefreshState};
