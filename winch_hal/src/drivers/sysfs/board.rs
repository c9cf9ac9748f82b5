//! Sysfs board implementation.
//!
//! Wiring (BCM numbering, all configurable):
//!
//! | Signal | Default | Notes |
//! |--------|---------|-------|
//! | Power relay | 27 | off at construction and on emergency |
//! | Reverse relay | 17 | active-low by default |
//! | Speed relay low/medium | 24 | |
//! | Speed relay high | 25 | |
//! | Hall U / V / W | 5 / 6 / 13 | polled once per tick |
//! | Throttle | pwmchip0/pwm0 | duty = throttle × period |

use super::gpio::{Direction, GpioLine, PwmChannel, read_attr};
use super::tachometer::{HallLevels, Tachometer};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use winch_common::config::SysfsConfig;
use winch_common::consts::BATTERY_FULL;
use winch_common::hal::board::{Board, BoardError, SpeedMode, check_throttle};
use winch_common::hal::consts::SYSFS_BOARD;

/// Raspberry Pi board implementing the `Board` trait.
pub struct SysfsBoard {
    config: SysfsConfig,
    power: GpioLine,
    reverse_line: GpioLine,
    speed_low: GpioLine,
    speed_high: GpioLine,
    hall_u: GpioLine,
    hall_v: GpioLine,
    hall_w: GpioLine,
    throttle: PwmChannel,
    throttle_value: f64,
    reverse: bool,
    speed_mode: SpeedMode,
    tachometer: Tachometer,
    epoch: Instant,
}

impl SysfsBoard {
    /// Export every line, program the throttle PWM and leave power off.
    pub fn open(config: &SysfsConfig) -> Result<Self, BoardError> {
        debug!("IO : Initialize Hardware...");
        let root = config.root.as_path();

        let board = Self {
            power: GpioLine::open(root, config.power_pin, Direction::Out)?,
            reverse_line: GpioLine::open(root, config.reverse_pin, Direction::Out)?,
            speed_low: GpioLine::open(root, config.speed_low_pin, Direction::Out)?,
            speed_high: GpioLine::open(root, config.speed_high_pin, Direction::Out)?,
            hall_u: GpioLine::open(root, config.hall_u_pin, Direction::In)?,
            hall_v: GpioLine::open(root, config.hall_v_pin, Direction::In)?,
            hall_w: GpioLine::open(root, config.hall_w_pin, Direction::In)?,
            throttle: PwmChannel::open(
                root,
                config.pwm_chip,
                config.pwm_channel,
                config.pwm_period_ns,
            )?,
            throttle_value: 0.0,
            reverse: false,
            speed_mode: SpeedMode::Low,
            tachometer: Tachometer::new(config.pulses_per_rotation),
            epoch: Instant::now(),
            config: config.clone(),
        };
        board.power.write(false)?;
        Ok(board)
    }

    /// Hall-sensor tachometer fed by [`Board::cycle`].
    pub fn tachometer(&self) -> &Tachometer {
        &self.tachometer
    }

    fn read_hall(&self) -> Result<HallLevels, BoardError> {
        Ok(HallLevels {
            u: self.hall_u.read()?,
            v: self.hall_v.read()?,
            w: self.hall_w.read()?,
        })
    }
}

impl Board for SysfsBoard {
    fn name(&self) -> &'static str {
        SYSFS_BOARD
    }

    fn initialize(&mut self) -> Result<(), BoardError> {
        self.tachometer.reset();
        self.set_reverse(false)?;
        self.set_speed_mode(SpeedMode::Low)?;
        self.throttle.set_duty(0.0)?;
        self.throttle_value = 0.0;
        self.throttle.enable(true)?;
        self.power.write(true)?;
        info!("IO : Hardware Initialized !");
        Ok(())
    }

    fn emergency(&mut self) {
        debug!("IO : Shutdown power !");
        if let Err(e) = self.power.write(false) {
            error!("IO : power relay cutoff failed: {e}");
        }
        if let Err(e) = self.throttle.set_duty(0.0) {
            error!("IO : throttle cutoff failed: {e}");
        }
        self.throttle_value = 0.0;
    }

    fn set_throttle_value(&mut self, value: f64) -> Result<(), BoardError> {
        check_throttle(value)?;
        if self.throttle_value != value {
            debug!("IO : Throttle to {}", value);
            self.throttle.set_duty(value)?;
            self.throttle_value = value;
        }
        Ok(())
    }

    fn throttle_value(&self) -> f64 {
        self.throttle_value
    }

    fn set_reverse(&mut self, enable: bool) -> Result<(), BoardError> {
        let level = enable != self.config.reverse_active_low;
        self.reverse_line.write(level)?;
        self.reverse = enable;
        debug!("IO : Change Reverse mode to : {}", enable);
        Ok(())
    }

    fn is_reverse(&self) -> bool {
        self.reverse
    }

    fn set_speed_mode(&mut self, mode: SpeedMode) -> Result<(), BoardError> {
        let (low, high) = match mode {
            SpeedMode::Low => (false, false),
            SpeedMode::Medium => (true, false),
            SpeedMode::High => (false, true),
        };
        self.speed_low.write(low)?;
        self.speed_high.write(high)?;
        self.speed_mode = mode;
        debug!("IO : Change Speed mode to {}", mode);
        Ok(())
    }

    fn speed_mode(&self) -> SpeedMode {
        self.speed_mode
    }

    fn battery(&self) -> Result<u8, BoardError> {
        let Some(path) = &self.config.battery_path else {
            return Ok(BATTERY_FULL);
        };
        let raw = read_attr(path)?;
        let level: u32 = raw.parse().map_err(|_| {
            BoardError::Io(format!("{}: not a percentage: {raw:?}", path.display()))
        })?;
        Ok(level.min(100) as u8)
    }

    fn rotation_from_begin(&self) -> Result<i64, BoardError> {
        Ok(self.tachometer.rotations())
    }

    fn rotation_from_end(&self) -> Result<i64, BoardError> {
        Ok(self.config.extent_rotations - self.tachometer.rotations())
    }

    fn motor_rpm(&self) -> Option<f64> {
        Some(self.tachometer.signed_rpm())
    }

    fn cycle(&mut self, _dt: Duration) -> Result<(), BoardError> {
        let levels = self.read_hall()?;
        let now_ms = self.epoch.elapsed().as_millis() as u64;
        self.tachometer.sample(levels, now_ms);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), BoardError> {
        self.emergency();
        self.throttle.enable(false)
    }
}
