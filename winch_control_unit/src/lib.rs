//! # OpenWinch Control Unit Library
//!
//! Control brain of the OpenWinch motorized winch. A dedicated thread runs
//! the [`mode::ModeEngine`] every `cycle_time_ms`, ramping the motor speed
//! toward the operator target, enforcing the cable limits of the configured
//! mode variant and pushing throttle/reverse outputs to the board.
//!
//! ## Components
//!
//! - [`state`] - Operational state holder
//! - [`controller`] - Operator command surface, owns the state and the board
//! - [`mode`] - Per-tick engine and the limit policy of each mode variant
//! - [`cycle`] - Control thread and cycle timing statistics
//! - [`safety`] - Emergency cutoff on drop and on panic
//! - [`console`] - Line-oriented operator console

pub mod console;
pub mod controller;
pub mod cycle;
pub mod error;
pub mod mode;
pub mod safety;
pub mod state;
