//! State machine module root.

pub mod machine;

pub use machine::StateMachine;
