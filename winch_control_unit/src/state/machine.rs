//! Operational state holder.
//!
//! The winch lifecycle is: Unknown → Booted → Init → Idle → Start → Running →
//! Stop → Idle, with Error reachable from anywhere. The guards that decide
//! whether a command may move the winch live in the controller; this type
//! only records the current state and logs every change.

use tracing::debug;
use winch_common::control::state::State;

/// Current operational state of the winch.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: State,
}

impl StateMachine {
    /// Create a state machine in `Unknown` state.
    pub const fn new() -> Self {
        Self {
            state: State::Unknown,
        }
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Move to `next`.
    ///
    /// Returns `false` and does nothing when `next` is already the current
    /// state.
    pub fn change_state(&mut self, next: State) -> bool {
        if self.state == next {
            return false;
        }
        debug!("Switch state : {} -> {}", self.state, next);
        self.state = next;
        true
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unknown() {
        assert_eq!(StateMachine::new().state(), State::Unknown);
        assert_eq!(StateMachine::default().state(), State::Unknown);
    }

    #[test]
    fn change_state_records_next() {
        let mut sm = StateMachine::new();
        assert!(sm.change_state(State::Booted));
        assert!(sm.change_state(State::Init));
        assert_eq!(sm.state(), State::Init);
    }

    #[test]
    fn same_state_is_noop() {
        let mut sm = StateMachine::new();
        sm.change_state(State::Idle);
        assert!(!sm.change_state(State::Idle));
        assert_eq!(sm.state(), State::Idle);
    }

    #[test]
    fn error_reachable_from_every_state() {
        for from in [
            State::Unknown,
            State::Booted,
            State::Init,
            State::Idle,
            State::Start,
            State::Running,
            State::Stop,
        ] {
            let mut sm = StateMachine::new();
            sm.change_state(from);
            assert!(sm.change_state(State::Error), "from {from}");
            assert!(sm.state().is_fault());
        }
    }
}
