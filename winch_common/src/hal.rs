//! Hardware abstraction layer: board capability interface.
//!
//! This module contains the [`board::Board`] trait implemented by every
//! concrete board (hardware driver or emulator) and its supporting types.

pub mod board;
pub mod consts;
