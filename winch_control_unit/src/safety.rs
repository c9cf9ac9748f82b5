//! Emergency cutoff outside the normal command path.
//!
//! Two hooks make sure the motor is cut whenever the process leaves service:
//! [`EmergencyGuard`] on scope exit (normal return, early error return,
//! unwinding) and [`install_panic_hook`] on a panic in any thread.

use std::panic;
use std::sync::Arc;

use tracing::error;

use crate::controller::WinchController;

/// Calls [`WinchController::emergency`] when dropped.
pub struct EmergencyGuard {
    winch: Arc<WinchController>,
}

impl EmergencyGuard {
    pub fn new(winch: Arc<WinchController>) -> Self {
        Self { winch }
    }
}

impl Drop for EmergencyGuard {
    fn drop(&mut self) {
        self.winch.emergency();
    }
}

/// Chain a panic hook that puts `winch` in emergency before the previous
/// hook runs.
pub fn install_panic_hook(winch: Arc<WinchController>) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        error!("Panic: {info}");
        winch.emergency();
        previous(info);
    }));
}
