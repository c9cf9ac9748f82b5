//! Raspberry Pi board over the Linux sysfs GPIO/PWM classes.

mod board;
pub mod gpio;
pub mod tachometer;

pub use board::SysfsBoard;

use winch_common::config::BoardConfig;
use winch_common::hal::board::{Board, BoardError};

/// Factory function to create a sysfs board instance.
pub fn create_board(config: &BoardConfig) -> Result<Box<dyn Board>, BoardError> {
    Ok(Box::new(SysfsBoard::open(&config.sysfs)?))
}
