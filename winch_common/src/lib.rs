//! OpenWinch Common Library
//!
//! This crate provides shared constants, configuration loading and the board
//! capability interface for all OpenWinch workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Default numeric limits of the winch
//! - [`config`] - Configuration loading traits and types
//! - [`control`] - Operational state, mode variants and distance conversion
//! - [`hal`] - Board capability trait and error types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use winch_common::prelude::*;
//!
//! let state = State::Idle;
//! assert!(state.is_stop());
//! ```

pub mod config;
pub mod consts;
pub mod control;
pub mod hal;
pub mod prelude;
