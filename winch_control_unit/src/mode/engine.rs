//! Per-tick mode engine.
//!
//! Each tick runs, in order: position sampling, Init, Start/Run ramp-up,
//! Stop ramp-down, the limit policy, the fault override, then actuation and
//! the board cycle hook. The engine is the single writer of the current
//! speed and of the throttle and reverse outputs.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use tracing::{debug, error, trace};
use winch_common::control::state::State;
use winch_common::hal::board::BoardError;

use super::policy::{LimitPolicy, Position};
use crate::controller::{SharedBoard, WinchController};
use crate::error::ControlError;

/// Ramp rates and throttle scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampSettings {
    /// Speed units added per tick while starting.
    pub velocity_start: i32,
    /// Speed units removed per tick while stopping.
    pub velocity_stop: i32,
    /// Speed value mapped to full throttle.
    pub motor_max: i32,
}

impl RampSettings {
    /// Throttle output for `speed`, in `0.0..=1.0`.
    pub fn throttle_for(&self, speed: i32) -> f64 {
        (f64::from(speed) / f64::from(self.motor_max)).clamp(0.0, 1.0)
    }
}

/// Mode engine driving one [`WinchController`].
pub struct ModeEngine {
    policy: LimitPolicy,
    ramp: RampSettings,
    board: SharedBoard,
    speed_current: i32,
    published: Arc<AtomicI32>,
    last_throttle: Option<f64>,
    fault_latched: bool,
}

impl ModeEngine {
    /// Attach an engine to `winch`.
    ///
    /// # Errors
    /// `ControlError::EngineAttached` if the controller already has one.
    pub fn new(winch: &WinchController) -> Result<Self, ControlError> {
        let published = winch.attach_engine()?;
        let policy = LimitPolicy::from_config(winch.mode_config());
        debug!("Mode engine : {}", policy.mode());
        Ok(Self {
            policy,
            ramp: winch.ramp(),
            board: Arc::clone(winch.board()),
            speed_current: 0,
            published,
            last_throttle: None,
            fault_latched: false,
        })
    }

    /// Speed applied on the last tick.
    pub fn speed_current(&self) -> i32 {
        self.speed_current
    }

    pub fn policy(&self) -> &LimitPolicy {
        &self.policy
    }

    /// Run one control tick. `dt` is the time since the previous tick.
    pub fn tick(&mut self, winch: &WinchController, dt: Duration) {
        let position = match self.read_position() {
            Ok(position) => Some(position),
            Err(e) => {
                self.hardware_fault(winch, "rotation read", &e);
                None
            }
        };

        if let Some(position) = position {
            trace!(
                "Current state : {} - speed : {} - limit : {}",
                winch.state(),
                self.speed_current,
                self.policy.limit_reached(position)
            );
        }

        if winch.state().is_init() {
            self.initialize(winch);
        }
        if winch.state().is_run() {
            self.starting(winch);
        }
        if winch.state() == State::Stop {
            self.stopping(winch);
        }
        if let Some(position) = position {
            self.extra_mode(winch, position);
        }
        if winch.state().is_fault() {
            self.fault();
        }

        self.apply_throttle_value(winch);
        self.published.store(self.speed_current, Ordering::SeqCst);

        let result = self.board.lock().cycle(dt);
        if let Err(e) = result {
            self.hardware_fault(winch, "board cycle", &e);
        }
    }

    fn read_position(&self) -> Result<Position, BoardError> {
        let board = self.board.lock();
        Ok(Position {
            from_begin: board.rotation_from_begin()?,
            from_end: board.rotation_from_end()?,
        })
    }

    fn initialize(&mut self, winch: &WinchController) {
        debug!("Initialize mode.");
        self.speed_current = 0;
        self.policy.reset();
        self.fault_latched = false;
        self.last_throttle = None;

        let result = self.board.lock().initialize();
        match result {
            Ok(()) => {
                winch.initialized();
            }
            Err(e) => self.hardware_fault(winch, "initialize", &e),
        }
    }

    fn starting(&mut self, winch: &WinchController) {
        let target = winch.speed_target();
        if self.speed_current < target {
            self.speed_current += self.ramp.velocity_start.min(target - self.speed_current);
        } else if self.speed_current > target {
            self.speed_current -= self.ramp.velocity_stop.min(self.speed_current - target);
        }
        if self.speed_current == target {
            winch.started();
        }
    }

    fn stopping(&mut self, winch: &WinchController) {
        if self.speed_current > 0 {
            self.speed_current -= self.ramp.velocity_stop.min(self.speed_current);
        }
        if self.speed_current <= 0 {
            self.speed_current = 0;
            winch.stopped();
        }
    }

    fn extra_mode(&mut self, winch: &WinchController, position: Position) {
        let running = winch.state().is_run();
        let reverse = self.board.lock().is_reverse();
        let outcome = self.policy.evaluate(running, reverse, position);

        if outcome.request_stop {
            debug!("Begin-side limit reached, stopping");
            winch.stop();
        }
        if let Some(enable) = outcome.set_reverse {
            debug!("Limit reached, reverse : {enable}");
            let result = self.board.lock().set_reverse(enable);
            if let Err(e) = result {
                self.hardware_fault(winch, "reverse", &e);
            }
        }
        if outcome.hold {
            self.speed_current = 0;
        }
    }

    fn fault(&mut self) {
        if !self.fault_latched {
            self.board.lock().emergency();
            self.fault_latched = true;
        }
        self.speed_current = 0;
    }

    fn apply_throttle_value(&mut self, winch: &WinchController) {
        let value = self.ramp.throttle_for(self.speed_current);
        if self.last_throttle == Some(value) {
            return;
        }
        let result = self.board.lock().set_throttle_value(value);
        match result {
            Ok(()) => self.last_throttle = Some(value),
            Err(e) => self.hardware_fault(winch, "throttle", &e),
        }
    }

    /// Board failures are hardware faults: the winch goes to `Error`.
    fn hardware_fault(&mut self, winch: &WinchController, what: &str, e: &BoardError) {
        if winch.state().is_fault() {
            debug!("Board {what} failed while in fault: {e}");
            return;
        }
        error!("Board {what} failed: {e}");
        winch.emergency();
        self.speed_current = 0;
    }
}
