//! System-wide constants for the OpenWinch workspace.
//!
//! Single source of truth for the stock winch. Every value here is only a
//! default: the configuration file may override it at boot.

/// Throttle scaling: speed value that maps to full throttle (1.0).
pub const MOTOR_MAX: i32 = 38;

/// Lowest target speed the operator may select.
pub const SPEED_MIN: i32 = 1;

/// Target speed after boot.
pub const SPEED_INIT: i32 = 30;

/// Highest target speed the operator may select.
pub const SPEED_MAX: i32 = 38;

/// Display unit of the speed values.
pub const SPEED_UNIT: &str = "km/h";

/// Drum diameter in meters.
pub const WINCH_DIAM: f64 = 0.2;

/// Usable cable length in meters.
pub const WINCH_DISTANCE: f64 = 200.0;

/// Control loop period in milliseconds.
pub const LOOP_DELAY_MS: u64 = 10;

/// Ramp-up step, in speed units per tick.
pub const VELOCITY_START: i32 = 1;

/// Ramp-down step, in speed units per tick.
pub const VELOCITY_STOP: i32 = 3;

/// Rotations kept free before the begin-side limit.
pub const SECURITY_BEGIN: i64 = 20;

/// Rotations kept free before the end-side limit.
pub const SECURITY_END: i64 = 20;

/// Dwell, in ticks, before the winch reverses direction.
pub const STANDBY_DURATION: u32 = 5;

/// Full cable extension of the emulated drum, in rotations.
pub const EMULATOR_EXTENT_ROTATIONS: i64 = 60;

/// Battery level reported when no gauge is wired.
pub const BATTERY_FULL: u8 = 100;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/openwinch/openwinch.toml";
