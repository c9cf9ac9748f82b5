//! Prelude module for common re-exports.
//!
//! ```rust
//! use winch_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    BoardConfig, ConfigError, ConfigLoader, ControlConfig, LogLevel, ModeConfig, SpeedConfig,
    WinchConfig,
};

// ─── Control ────────────────────────────────────────────────────────
pub use crate::control::distance::{distance_to_rotate, rotate_to_distance};
pub use crate::control::mode::ModeType;
pub use crate::control::state::State;

// ─── Board ──────────────────────────────────────────────────────────
pub use crate::hal::board::{Board, BoardError, BoardFactory, SpeedMode};
