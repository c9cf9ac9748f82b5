//! Emulator board module.
//!
//! Software board for running the full control stack without a winch
//! attached.

mod board;

pub use board::EmulatorBoard;

use winch_common::config::BoardConfig;
use winch_common::hal::board::{Board, BoardError};

/// Factory function to create an emulator board instance.
pub fn create_board(config: &BoardConfig) -> Result<Box<dyn Board>, BoardError> {
    Ok(Box::new(EmulatorBoard::new(
        config.emulator.extent_rotations,
        config.emulator.battery,
    )))
}
