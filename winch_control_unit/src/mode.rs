//! Mode engine module root.
//!
//! [`ModeEngine`] is the per-tick algorithm shared by every mode variant;
//! [`LimitPolicy`] carries the part that differs between OneWay, TwoWay and
//! Infinity.

pub mod engine;
pub mod policy;

pub use engine::{ModeEngine, RampSettings};
pub use policy::{LimitPolicy, PolicyOutcome, Position};
