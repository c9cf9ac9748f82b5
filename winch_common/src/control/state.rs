//! Operational state of the winch.
//!
//! The state value is the whole state machine: legality of a transition is
//! decided by the controller before it assigns a new state. The predicates
//! below partition the states into the groups the controller and the mode
//! engine reason about.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational state of the winch.
///
/// `Unknown` only exists between process start and the control loop coming
/// up. `Error` is reachable from every state; leaving it requires `Init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum State {
    /// Process started, control loop not running yet.
    Unknown = -999,
    /// Control loop running, hardware not initialized.
    Booted = -2,
    /// Fault: power cut, must re-initialize.
    Error = -1,
    /// Hardware zeroing requested.
    Init = 0,
    /// Ready, motor stopped.
    Idle = 1,
    /// Ramping up toward target speed.
    Start = 2,
    /// At target speed.
    Running = 3,
    /// Ramping down toward zero.
    Stop = 4,
}

impl State {
    /// Running-like: `Start` or `Running`.
    #[inline]
    pub const fn is_run(self) -> bool {
        matches!(self, Self::Start | Self::Running)
    }

    /// Stopped-like: `Stop` or `Idle`.
    #[inline]
    pub const fn is_stop(self) -> bool {
        matches!(self, Self::Stop | Self::Idle)
    }

    /// Fault: `Error`.
    #[inline]
    pub const fn is_fault(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Initializing: `Init`.
    #[inline]
    pub const fn is_init(self) -> bool {
        matches!(self, Self::Init)
    }

    /// Booted: anything but `Unknown`.
    #[inline]
    pub const fn is_boot(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Upper-case name used in logs and status payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Booted => "BOOTED",
            Self::Error => "ERROR",
            Self::Init => "INIT",
            Self::Idle => "IDLE",
            Self::Start => "START",
            Self::Running => "RUNNING",
            Self::Stop => "STOP",
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
