//! Configuration loading traits and types.
//!
//! The whole winch is configured from one TOML file read once at boot and
//! immutable afterwards. Every section and field has a default, so an empty
//! file describes the stock winch on the emulator board.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//!
//! [board]
//! driver = "sysfs"
//!
//! [board.sysfs]
//! reverse_pin = 17
//!
//! [mode]
//! variant = "two_way"
//! standby_duration = 8
//!
//! [control]
//! cycle_time_ms = 20
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use winch_common::config::{ConfigError, WinchConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = WinchConfig::from_file(Path::new("openwinch.toml"))?;
//!     println!("Mode: {}", config.mode.variant);
//!     Ok(())
//! }
//! ```

use crate::consts::{
    BATTERY_FULL, EMULATOR_EXTENT_ROTATIONS, LOOP_DELAY_MS, MOTOR_MAX, SECURITY_BEGIN,
    SECURITY_END, SPEED_INIT, SPEED_MAX, SPEED_MIN, SPEED_UNIT, STANDBY_DURATION,
    VELOCITY_START, VELOCITY_STOP, WINCH_DIAM, WINCH_DISTANCE,
};
use crate::control::mode::ModeType;
use crate::hal::consts::{DEFAULT_BOARD, DEFAULT_SYSFS_ROOT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration loading operations.
///
/// Every variant is a configuration fault: fatal at boot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// Mode variant name not recognized.
    #[error("Bad mode config: {0}")]
    UnknownMode(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, per-tick tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Common process-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
    /// Logging verbosity level.
    pub log_level: LogLevel,

    /// Instance identifier, used in logs.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            service_name: "openwinch".to_string(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[board]` section: which board implementation to construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Registered board name ("emulator", "sysfs").
    pub driver: String,
    /// Emulator settings.
    pub emulator: EmulatorConfig,
    /// Raspberry Pi sysfs settings.
    pub sysfs: SysfsConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_BOARD.to_string(),
            emulator: EmulatorConfig::default(),
            sysfs: SysfsConfig::default(),
        }
    }
}

/// `[board.emulator]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmulatorConfig {
    /// Rotations between the wound and fully extended positions.
    pub extent_rotations: i64,
    /// Battery level reported, percent.
    pub battery: u8,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            extent_rotations: EMULATOR_EXTENT_ROTATIONS,
            battery: BATTERY_FULL,
        }
    }
}

/// `[board.sysfs]` section: BCM line numbers and PWM channel of the
/// Raspberry Pi wiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SysfsConfig {
    /// sysfs class root (`/sys/class`).
    pub root: PathBuf,
    /// Motor controller power relay.
    pub power_pin: u32,
    /// Reverse relay.
    pub reverse_pin: u32,
    /// Reverse relay is energized for forward drive.
    pub reverse_active_low: bool,
    /// Speed-range relay, low/medium line.
    pub speed_low_pin: u32,
    /// Speed-range relay, high line.
    pub speed_high_pin: u32,
    /// Hall sensor inputs.
    pub hall_u_pin: u32,
    pub hall_v_pin: u32,
    pub hall_w_pin: u32,
    /// PWM chip index of the throttle output.
    pub pwm_chip: u32,
    /// PWM channel of the throttle output.
    pub pwm_channel: u32,
    /// Throttle PWM period, nanoseconds.
    pub pwm_period_ns: u64,
    /// Hall U pulses per drum rotation.
    pub pulses_per_rotation: u32,
    /// Rotations between the wound and fully extended positions.
    pub extent_rotations: i64,
    /// Optional file holding the battery percentage.
    pub battery_path: Option<PathBuf>,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            power_pin: 27,
            reverse_pin: 17,
            reverse_active_low: true,
            speed_low_pin: 24,
            speed_high_pin: 25,
            hall_u_pin: 5,
            hall_v_pin: 6,
            hall_w_pin: 13,
            pwm_chip: 0,
            pwm_channel: 0,
            pwm_period_ns: 1_000_000,
            pulses_per_rotation: 3,
            extent_rotations: (WINCH_DISTANCE / (WINCH_DIAM * std::f64::consts::PI)) as i64,
            battery_path: None,
        }
    }
}

/// `[mode]` section: limit-handling policy and its margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModeConfig {
    /// Mode variant.
    pub variant: ModeType,
    /// Rotations kept free before the begin-side limit.
    pub security_begin: i64,
    /// Rotations kept free before the end-side limit.
    pub security_end: i64,
    /// Dwell before reversing, in ticks (TwoWay).
    pub standby_duration: u32,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            variant: ModeType::default(),
            security_begin: SECURITY_BEGIN,
            security_end: SECURITY_END,
            standby_duration: STANDBY_DURATION,
        }
    }
}

/// `[control]` section: control loop cadence and ramp rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    /// Tick interval, milliseconds.
    pub cycle_time_ms: u64,
    /// Ramp-up step per tick.
    pub velocity_start: i32,
    /// Ramp-down step per tick.
    pub velocity_stop: i32,
    /// Speed value mapped to full throttle.
    pub motor_max: i32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            cycle_time_ms: LOOP_DELAY_MS,
            velocity_start: VELOCITY_START,
            velocity_stop: VELOCITY_STOP,
            motor_max: MOTOR_MAX,
        }
    }
}

impl ControlConfig {
    /// Tick interval as a `Duration`.
    pub fn cycle_time(&self) -> Duration {
        Duration::from_millis(self.cycle_time_ms)
    }
}

/// `[speed]` section: target speed bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpeedConfig {
    pub min: i32,
    pub init: i32,
    pub max: i32,
    /// Display unit.
    pub unit: String,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            min: SPEED_MIN,
            init: SPEED_INIT,
            max: SPEED_MAX,
            unit: SPEED_UNIT.to_string(),
        }
    }
}

/// `[winch]` section: drum geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrumConfig {
    /// Drum diameter, meters.
    pub diameter_m: f64,
    /// Usable cable length, meters. Reference for the cable percentage.
    pub distance_m: f64,
}

impl Default for DrumConfig {
    fn default() -> Self {
        Self {
            diameter_m: WINCH_DIAM,
            distance_m: WINCH_DISTANCE,
        }
    }
}

/// Complete winch configuration, read once at boot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WinchConfig {
    pub shared: SharedConfig,
    pub board: BoardConfig,
    pub mode: ModeConfig,
    pub control: ControlConfig,
    pub speed: SpeedConfig,
    pub winch: DrumConfig,
}

impl WinchConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. `service_name` not empty
    /// 2. `board.driver` not empty
    /// 3. `cycle_time_ms`, `velocity_start`, `velocity_stop`, `motor_max` > 0
    /// 4. `speed.min <= speed.init <= speed.max <= control.motor_max`
    /// 5. Security margins >= 0
    /// 6. Drum diameter > 0
    /// 7. Board extents > 0, `pulses_per_rotation` > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.board.driver.trim().is_empty() {
            return Err(invalid("board.driver cannot be empty"));
        }

        if self.control.cycle_time_ms == 0 {
            return Err(invalid("control.cycle_time_ms must be greater than 0"));
        }
        if self.control.velocity_start <= 0 || self.control.velocity_stop <= 0 {
            return Err(invalid(
                "control.velocity_start and control.velocity_stop must be greater than 0",
            ));
        }
        if self.control.motor_max <= 0 {
            return Err(invalid("control.motor_max must be greater than 0"));
        }

        let s = &self.speed;
        if !(s.min <= s.init && s.init <= s.max) {
            return Err(ConfigError::ValidationError(format!(
                "speed bounds must satisfy min <= init <= max (got {} / {} / {})",
                s.min, s.init, s.max
            )));
        }
        if s.max > self.control.motor_max {
            return Err(ConfigError::ValidationError(format!(
                "speed.max {} exceeds control.motor_max {}",
                s.max, self.control.motor_max
            )));
        }
        if s.min < 0 {
            return Err(invalid("speed.min cannot be negative"));
        }

        if self.mode.security_begin < 0 || self.mode.security_end < 0 {
            return Err(invalid("mode security margins cannot be negative"));
        }

        if !(self.winch.diameter_m > 0.0) {
            return Err(invalid("winch.diameter_m must be greater than 0"));
        }
        if !(self.winch.distance_m > 0.0) {
            return Err(invalid("winch.distance_m must be greater than 0"));
        }

        if self.board.emulator.extent_rotations <= 0 || self.board.sysfs.extent_rotations <= 0 {
            return Err(invalid("board extent_rotations must be greater than 0"));
        }
        if self.board.emulator.battery > 100 {
            return Err(invalid("board.emulator.battery must be within 0..=100"));
        }
        if self.board.sysfs.pulses_per_rotation == 0 {
            return Err(invalid("board.sysfs.pulses_per_rotation must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::ValidationError(msg.to_string())
}

/// Trait for loading configuration from TOML files.
///
/// This trait provides a default implementation that works with any type
/// implementing `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
