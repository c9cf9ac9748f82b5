//! Board implementations.
//!
//! - [`emulator`] - Software board for development, testing and demos
//! - [`sysfs`] - Raspberry Pi board driven through the Linux sysfs GPIO/PWM classes
//!
//! # Adding New Boards
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `Board` trait from `winch_common::hal::board`
//! 3. Register its factory in [`register_builtin_boards`]

pub mod emulator;
pub mod sysfs;

use crate::board_registry::BoardRegistry;
use winch_common::hal::consts::{EMULATOR_BOARD, SYSFS_BOARD};

/// Register all built-in boards into `registry`.
pub fn register_builtin_boards(registry: &mut BoardRegistry) {
    registry.register(EMULATOR_BOARD, emulator::create_board);
    registry.register(SYSFS_BOARD, sysfs::create_board);
}
