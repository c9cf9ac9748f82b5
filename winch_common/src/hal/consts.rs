//! HAL constants: names under which the built-in boards are registered.

/// Software emulator board.
pub const EMULATOR_BOARD: &str = "emulator";

/// Raspberry Pi board driven through the Linux sysfs GPIO/PWM classes.
pub const SYSFS_BOARD: &str = "sysfs";

/// Board selected when the configuration does not name one.
pub const DEFAULT_BOARD: &str = EMULATOR_BOARD;

/// Default sysfs class root.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class";
