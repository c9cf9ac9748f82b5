//! Emulator board implementation.
//!
//! The emulated drum moves one rotation per tick: any throttle winds the
//! cable in (or out, when reversed); with the throttle released and the board
//! armed the rider drags the cable out.

use std::time::Duration;
use tracing::{debug, info};
use winch_common::hal::board::{Board, BoardError, SpeedMode, check_throttle};
use winch_common::hal::consts::EMULATOR_BOARD;

/// Emulator board implementing the `Board` trait.
#[derive(Debug, Clone)]
pub struct EmulatorBoard {
    /// Rotations between wound and fully extended
    extent_rotations: i64,
    /// Reported battery level
    battery: u8,
    /// Power relay state
    armed: bool,
    /// Last throttle value
    throttle: f64,
    /// Reverse relay state
    reverse: bool,
    /// Speed-range relay state
    speed_mode: SpeedMode,
    /// Rotations since the initialization reference
    rotation: i64,
}

impl EmulatorBoard {
    /// Create a disarmed emulator.
    pub fn new(extent_rotations: i64, battery: u8) -> Self {
        Self {
            extent_rotations,
            battery: battery.min(100),
            armed: false,
            throttle: 0.0,
            reverse: false,
            speed_mode: SpeedMode::Low,
            rotation: 0,
        }
    }

    /// Whether power is on.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Move the drum by `rotations` as if the cable had been pulled by hand.
    pub fn pay_out(&mut self, rotations: i64) {
        self.rotation += rotations;
    }
}

impl Board for EmulatorBoard {
    fn name(&self) -> &'static str {
        EMULATOR_BOARD
    }

    fn initialize(&mut self) -> Result<(), BoardError> {
        self.rotation = 0;
        self.throttle = 0.0;
        self.reverse = false;
        self.speed_mode = SpeedMode::Low;
        self.armed = true;
        info!("IO : Emulator Initialized !");
        Ok(())
    }

    fn emergency(&mut self) {
        self.armed = false;
        self.throttle = 0.0;
        info!("IO : Emulator Emergency mode !");
    }

    fn set_throttle_value(&mut self, value: f64) -> Result<(), BoardError> {
        check_throttle(value)?;
        if self.throttle != value {
            self.throttle = value;
            debug!("IO : Throttle to {}", self.throttle);
        }
        Ok(())
    }

    fn throttle_value(&self) -> f64 {
        self.throttle
    }

    fn set_reverse(&mut self, enable: bool) -> Result<(), BoardError> {
        self.reverse = enable;
        debug!("IO : Change Reverse mode to : {}", self.reverse);
        Ok(())
    }

    fn is_reverse(&self) -> bool {
        self.reverse
    }

    fn set_speed_mode(&mut self, mode: SpeedMode) -> Result<(), BoardError> {
        self.speed_mode = mode;
        debug!("IO : Change Speed mode to {}", self.speed_mode);
        Ok(())
    }

    fn speed_mode(&self) -> SpeedMode {
        self.speed_mode
    }

    fn battery(&self) -> Result<u8, BoardError> {
        Ok(self.battery)
    }

    fn rotation_from_begin(&self) -> Result<i64, BoardError> {
        Ok(self.rotation)
    }

    fn rotation_from_end(&self) -> Result<i64, BoardError> {
        Ok(self.extent_rotations - self.rotation)
    }

    fn cycle(&mut self, _dt: Duration) -> Result<(), BoardError> {
        if self.armed && self.throttle > 0.0 {
            self.rotation += if self.reverse { 1 } else { -1 };
        } else if self.armed {
            self.rotation += 1;
        }
        Ok(())
    }
}
