//! Board capability trait and error types.
//!
//! This module defines:
//! - `Board` trait - Capability set over the winch actuators and sensors
//! - `BoardError` enum - Error types for board operations
//! - `SpeedMode` enum - Position of the motor controller speed-range relay
//! - `BoardFactory` type alias - Factory function type

use crate::config::BoardConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error types for board operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    /// No board registered under this name
    #[error("Board not found: {0}")]
    DriverNotFound(String),

    /// Board could not be armed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Board configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Hardware communication error (sysfs read/write, sensor read)
    #[error("Hardware communication error: {0}")]
    Io(String),

    /// Value outside the accepted range
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Position of the motor controller speed-range relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedMode {
    /// Low range (default after initialization).
    #[default]
    Low,
    /// Medium range.
    Medium,
    /// High range.
    High,
}

impl fmt::Display for SpeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        })
    }
}

/// Factory function type for creating board instances from configuration.
pub type BoardFactory = fn(&BoardConfig) -> Result<Box<dyn Board>, BoardError>;

/// Capability set over the physical winch.
///
/// The mode engine is the only writer of throttle and reverse; the
/// controller only calls [`Board::emergency`] and [`Board::set_speed_mode`].
///
/// # Lifecycle
///
/// 1. Constructed once at boot by its factory
/// 2. `initialize()` - Re-arms the board and zeroes the rotation reference
///    (may be called again after every fault)
/// 3. `cycle()` - Called once per control tick, after actuation
/// 4. `emergency()` - Cuts power; the board stays disabled until the next
///    `initialize()`
/// 5. `shutdown()` - Called once when the process exits
pub trait Board: Send {
    /// Returns the board's registered name (e.g., "emulator", "sysfs").
    fn name(&self) -> &'static str;

    /// Arm the board: power on, throttle 0, reverse off, speed LOW, rotation
    /// reference reset to 0.
    ///
    /// # Errors
    /// Return `BoardError::InitFailed` or `BoardError::Io` if the hardware
    /// cannot be armed.
    fn initialize(&mut self) -> Result<(), BoardError>;

    /// Cut motor power.
    ///
    /// Infallible by contract: implementations log and swallow hardware
    /// failures so the cutoff is always attempted on every output.
    fn emergency(&mut self);

    /// Set the throttle output, `0.0..=1.0`.
    fn set_throttle_value(&mut self, value: f64) -> Result<(), BoardError>;

    /// Last throttle value applied.
    fn throttle_value(&self) -> f64;

    /// Engage or release the reverse relay.
    fn set_reverse(&mut self, enable: bool) -> Result<(), BoardError>;

    /// Whether the reverse relay is engaged.
    fn is_reverse(&self) -> bool;

    /// Select the speed-range relay position.
    fn set_speed_mode(&mut self, mode: SpeedMode) -> Result<(), BoardError>;

    /// Current speed-range relay position.
    fn speed_mode(&self) -> SpeedMode;

    /// Battery charge, percent `0..=100`.
    fn battery(&self) -> Result<u8, BoardError>;

    /// Rotations from the initialization reference (drum fully wound).
    fn rotation_from_begin(&self) -> Result<i64, BoardError>;

    /// Rotations left before the full-extension reference.
    fn rotation_from_end(&self) -> Result<i64, BoardError>;

    /// Measured motor speed in rotations per minute, signed by direction.
    ///
    /// `None` when the board has no speed sensor (default).
    fn motor_rpm(&self) -> Option<f64> {
        None
    }

    /// Per-tick hook for sensor polling or simulated physics.
    ///
    /// Default implementation does nothing.
    fn cycle(&mut self, _dt: Duration) -> Result<(), BoardError> {
        Ok(())
    }

    /// Release hardware resources.
    ///
    /// Default implementation does nothing.
    fn shutdown(&mut self) -> Result<(), BoardError> {
        Ok(())
    }
}

/// Reject throttle values outside `0.0..=1.0` (NaN included).
pub fn check_throttle(value: f64) -> Result<(), BoardError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(BoardError::InvalidValue(format!(
            "throttle {value} outside 0.0..=1.0"
        )))
    }
}
