//! Winch controller: the operator command surface.
//!
//! The controller owns the operational state, the target speed and the
//! board. Commands are accepted from any thread; an illegal command is
//! logged and ignored, it never fails the caller. The current speed is owned
//! by the [`ModeEngine`](crate::mode::ModeEngine) and only published here.
//!
//! Lock order: the state lock and the board lock are never held together.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use winch_common::config::{ModeConfig, WinchConfig};
use winch_common::control::distance::{cable_percent, rotate_to_distance, rpm_to_kph};
use winch_common::control::mode::ModeType;
use winch_common::control::state::State;
use winch_common::hal::board::{Board, SpeedMode};

use crate::cycle::ControlLoop;
use crate::error::ControlError;
use crate::mode::RampSettings;
use crate::state::StateMachine;

/// Board shared between the controller and the mode engine.
pub type SharedBoard = Arc<Mutex<Box<dyn Board>>>;

/// How long [`WinchController::emergency`] waits for each lock.
const EMERGENCY_LOCK_TIMEOUT: Duration = Duration::from_millis(50);

/// Bounds of the operator target speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedLimits {
    pub min: i32,
    pub init: i32,
    pub max: i32,
}

impl SpeedLimits {
    /// Clamp `value` into `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// Snapshot of the winch for displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinchStatus {
    pub state: State,
    pub mode: ModeType,
    pub speed_target: i32,
    pub speed_current: i32,
    pub speed_unit: String,
    /// `None` when the rotation sensor could not be read.
    pub distance_m: Option<f64>,
    /// Paid-out share of the usable cable length, percent.
    pub cable_percent: Option<f64>,
    /// Measured cable speed in km/h, signed by drum direction. `None` on
    /// boards without a speed sensor.
    pub cable_speed_kph: Option<f64>,
    /// `None` when the battery gauge could not be read.
    pub battery: Option<u8>,
    pub throttle: f64,
    pub reverse: bool,
    pub speed_mode: SpeedMode,
}

struct Command {
    machine: StateMachine,
    speed_target: i32,
}

/// Operator-facing winch controller.
pub struct WinchController {
    mode: ModeType,
    limits: SpeedLimits,
    speed_unit: String,
    diameter: f64,
    cable_length: f64,
    cycle_time: Duration,
    mode_config: ModeConfig,
    ramp: RampSettings,
    command: Mutex<Command>,
    board: SharedBoard,
    speed_current: Arc<AtomicI32>,
    engine_attached: AtomicBool,
}

impl WinchController {
    /// Build a controller in `Unknown` state around an already created board.
    pub fn new(config: &WinchConfig, board: Box<dyn Board>) -> Self {
        let limits = SpeedLimits {
            min: config.speed.min,
            init: config.speed.init,
            max: config.speed.max,
        };
        Self {
            mode: config.mode.variant,
            limits,
            speed_unit: config.speed.unit.clone(),
            diameter: config.winch.diameter_m,
            cable_length: config.winch.distance_m,
            cycle_time: config.control.cycle_time(),
            mode_config: config.mode.clone(),
            ramp: RampSettings {
                velocity_start: config.control.velocity_start,
                velocity_stop: config.control.velocity_stop,
                motor_max: config.control.motor_max,
            },
            command: Mutex::new(Command {
                machine: StateMachine::new(),
                speed_target: limits.clamp(limits.init),
            }),
            board: Arc::new(Mutex::new(board)),
            speed_current: Arc::new(AtomicI32::new(0)),
            engine_attached: AtomicBool::new(false),
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// Configured mode variant.
    pub fn mode(&self) -> ModeType {
        self.mode
    }

    /// Target speed bounds.
    pub fn speed_limits(&self) -> SpeedLimits {
        self.limits
    }

    pub fn speed_unit(&self) -> &str {
        &self.speed_unit
    }

    /// Control tick period.
    pub fn cycle_time(&self) -> Duration {
        self.cycle_time
    }

    pub fn state(&self) -> State {
        self.command.lock().machine.state()
    }

    /// Operator-requested speed, always within [`SpeedLimits`].
    pub fn speed_target(&self) -> i32 {
        self.command.lock().speed_target
    }

    /// Speed currently applied by the mode engine.
    pub fn speed_current(&self) -> i32 {
        self.speed_current.load(Ordering::SeqCst)
    }

    /// Paid-out cable length in meters.
    pub fn distance(&self) -> Option<f64> {
        let rotations = self.board.lock().rotation_from_begin();
        match rotations {
            Ok(rotations) => Some(rotate_to_distance(rotations, self.diameter)),
            Err(e) => {
                warn!("Distance unavailable: {e}");
                None
            }
        }
    }

    /// Battery charge in percent.
    pub fn battery(&self) -> Option<u8> {
        let level = self.board.lock().battery();
        match level {
            Ok(level) => Some(level),
            Err(e) => {
                warn!("Battery unavailable: {e}");
                None
            }
        }
    }

    /// Board handle, for status readers and the mode engine.
    pub fn board(&self) -> &SharedBoard {
        &self.board
    }

    /// Collect a display snapshot.
    pub fn status(&self) -> WinchStatus {
        let (state, speed_target) = {
            let command = self.command.lock();
            (command.machine.state(), command.speed_target)
        };
        let (throttle, reverse, speed_mode, rpm) = {
            let board = self.board.lock();
            (
                board.throttle_value(),
                board.is_reverse(),
                board.speed_mode(),
                board.motor_rpm(),
            )
        };
        let distance_m = self.distance();
        WinchStatus {
            state,
            mode: self.mode,
            speed_target,
            speed_current: self.speed_current(),
            speed_unit: self.speed_unit.clone(),
            distance_m,
            cable_percent: distance_m.map(|d| cable_percent(d, self.cable_length)),
            cable_speed_kph: rpm.map(|rpm| rpm_to_kph(rpm, self.diameter)),
            battery: self.battery(),
            throttle,
            reverse,
            speed_mode,
        }
    }

    // ─── Operator commands ──────────────────────────────────────────

    /// Request (re-)initialization. Legal from every state.
    pub fn initialize(&self) {
        info!("Init");
        self.command.lock().machine.change_state(State::Init);
    }

    /// Request a start. Only legal while stopped.
    pub fn start(&self) {
        info!("Press Start");
        let mut command = self.command.lock();
        let state = command.machine.state();
        if state.is_stop() {
            command.machine.change_state(State::Start);
        } else if state == State::Start {
            warn!("Start already requested");
        } else {
            error!("Not possible to start, re-initialize winch ! (state {state})");
        }
    }

    /// Request a stop. Only legal while running.
    pub fn stop(&self) {
        info!("Press Stop");
        let mut command = self.command.lock();
        let state = command.machine.state();
        if state.is_run() {
            command.machine.change_state(State::Stop);
        } else if state == State::Stop {
            warn!("Stop already requested");
        } else {
            error!("Not possible to stop, winch is not running ! (state {state})");
        }
    }

    /// Enter `Error` and cut the motor. Legal from every state.
    ///
    /// Both locks are only waited on for a short while, so a panic raised
    /// while the calling thread holds one of them cannot hang the cutoff. If
    /// the state lock cannot be taken the board is still cut. If the board
    /// lock cannot be taken the cutoff is left to the mode engine, which zeroes
    /// the speed and fires the board emergency on its next tick in `Error`.
    pub fn emergency(&self) {
        error!("HALT EMERGENCY");
        match self.command.try_lock_for(EMERGENCY_LOCK_TIMEOUT) {
            Some(mut command) => {
                command.machine.change_state(State::Error);
            }
            None => error!("State busy, cutting the motor without entering Error"),
        }
        match self.board.try_lock_for(EMERGENCY_LOCK_TIMEOUT) {
            Some(mut board) => board.emergency(),
            None => error!("Board busy, motor cutoff deferred to the control loop"),
        }
    }

    /// Adjust the target speed up by `delta`, saturating at the maximum.
    pub fn speed_up(&self, delta: u32) {
        self.update_target(|target| target.saturating_add_unsigned(delta));
    }

    /// Adjust the target speed down by `delta`, saturating at the minimum.
    pub fn speed_down(&self, delta: u32) {
        self.update_target(|target| target.saturating_sub_unsigned(delta));
    }

    /// Set the target speed, clamped into the configured bounds.
    pub fn speed_value(&self, value: i32) {
        if !(self.limits.min..=self.limits.max).contains(&value) {
            warn!(
                "Speed {value} out of range [{}, {}], clamped",
                self.limits.min, self.limits.max
            );
        }
        self.update_target(|_| value);
    }

    /// Select the motor controller speed range.
    pub fn set_speed_mode(&self, mode: SpeedMode) {
        info!("Speed mode : {mode}");
        let result = self.board.lock().set_speed_mode(mode);
        if let Err(e) = result {
            error!("Speed mode {mode} failed: {e}");
            self.emergency();
        }
    }

    fn update_target(&self, f: impl FnOnce(i32) -> i32) {
        let mut command = self.command.lock();
        let next = self.limits.clamp(f(command.speed_target));
        if next != command.speed_target {
            debug!("Speed target : {} -> {next} {}", command.speed_target, self.speed_unit);
            command.speed_target = next;
        }
    }

    // ─── Signals from the control loop ──────────────────────────────

    /// Control loop is up: `Unknown` → `Booted`.
    pub fn booted(&self) -> bool {
        self.transition(State::Unknown, State::Booted)
    }

    /// Board armed: `Init` → `Idle`.
    pub fn initialized(&self) -> bool {
        self.transition(State::Init, State::Idle)
    }

    /// Target speed reached: `Start` → `Running`.
    pub fn started(&self) -> bool {
        self.transition(State::Start, State::Running)
    }

    /// Motor at rest: `Stop` → `Idle`.
    pub fn stopped(&self) -> bool {
        self.transition(State::Stop, State::Idle)
    }

    fn transition(&self, from: State, to: State) -> bool {
        let mut command = self.command.lock();
        command.machine.state() == from && command.machine.change_state(to)
    }

    // ─── Mode engine wiring ─────────────────────────────────────────

    /// Spawn the control thread and mark the winch `Booted`.
    pub fn start_control_loop(self: &Arc<Self>) -> Result<ControlLoop, ControlError> {
        let control_loop = ControlLoop::spawn(Arc::clone(self), self.cycle_time)?;
        self.booted();
        Ok(control_loop)
    }

    pub(crate) fn mode_config(&self) -> &ModeConfig {
        &self.mode_config
    }

    pub(crate) fn ramp(&self) -> RampSettings {
        self.ramp
    }

    /// Hand the current-speed cell to the single engine allowed to write it.
    pub(crate) fn attach_engine(&self) -> Result<Arc<AtomicI32>, ControlError> {
        if self.engine_attached.swap(true, Ordering::SeqCst) {
            return Err(ControlError::EngineAttached);
        }
        Ok(Arc::clone(&self.speed_current))
    }
}
