//! # OpenWinch HAL Library
//!
//! Board registry and concrete board implementations.
//!
//! Boards implement the `Board` trait defined in `winch_common::hal::board`.
//! The control unit never names a concrete board: it asks a
//! [`BoardRegistry`] for the one selected in configuration.
//!
//! # Module Structure
//!
//! - [`board_registry`] - Board factory registration
//! - [`drivers`] - Board implementations (emulator, sysfs)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       winch_hal                              │
//! │  ┌──────────────────┐        ┌────────────────────────────┐  │
//! │  │  BoardRegistry   │──────► │  Box<dyn Board>            │  │
//! │  │  name → factory  │        │  EmulatorBoard | SysfsBoard│  │
//! │  └──────────────────┘        └────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod board_registry;
pub mod drivers;

// Re-export key types for convenience
pub use crate::board_registry::BoardRegistry;
pub use crate::drivers::emulator::EmulatorBoard;
pub use crate::drivers::sysfs::SysfsBoard;
