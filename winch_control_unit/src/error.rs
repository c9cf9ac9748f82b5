//! Control unit error types.
//!
//! Operator commands never fail: illegal requests are logged and ignored.
//! These errors only surface at boot and when supervising the control loop.

use thiserror::Error;
use winch_common::config::ConfigError;
use winch_common::hal::board::BoardError;

/// Errors raised while booting or supervising the winch.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Board could not be created.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// A mode engine already drives this controller.
    #[error("a mode engine is already attached to this winch")]
    EngineAttached,

    /// Control thread could not be spawned.
    #[error("failed to spawn control loop: {0}")]
    Spawn(String),

    /// Signal handler could not be installed.
    #[error("failed to install signal handler: {0}")]
    Signal(String),

    /// Control thread exited while the winch was in service.
    #[error("control loop terminated unexpectedly")]
    LoopTerminated,
}
