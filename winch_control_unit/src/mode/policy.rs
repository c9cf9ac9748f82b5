//! Cable limit policies of the mode variants.
//!
//! A policy looks at the drum position once per tick and tells the engine
//! what to do about it. It never touches the board itself.

use winch_common::config::ModeConfig;
use winch_common::control::mode::ModeType;

/// Drum position sampled at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Rotations from the wound reference.
    pub from_begin: i64,
    /// Rotations left before full extension.
    pub from_end: i64,
}

/// Requests returned by [`LimitPolicy::evaluate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyOutcome {
    /// Ask the controller to stop.
    pub request_stop: bool,
    /// New reverse relay position.
    pub set_reverse: Option<bool>,
    /// Force the current speed to 0 for this tick.
    pub hold: bool,
}

/// True when the begin-side safety margin is reached.
#[inline]
pub fn is_begin_security(from_begin: i64, margin: i64) -> bool {
    from_begin - margin <= 0
}

/// True when the end-side safety margin is reached.
#[inline]
pub fn is_end_security(from_end: i64, margin: i64) -> bool {
    from_end - margin <= 0
}

/// Limit behaviour of a mode variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitPolicy {
    /// Stop once the cable is wound in to the begin-side margin.
    OneWay { security_begin: i64 },
    /// Reverse at either margin after holding the motor for `standby_duration`
    /// ticks.
    TwoWay {
        security_begin: i64,
        security_end: i64,
        standby_duration: u32,
        /// Hold ticks left, the trigger tick included.
        cooldown: u32,
    },
    /// No limits.
    Infinity,
}

impl LimitPolicy {
    pub fn from_config(config: &ModeConfig) -> Self {
        match config.variant {
            ModeType::OneWay => Self::OneWay {
                security_begin: config.security_begin,
            },
            ModeType::TwoWay => Self::TwoWay {
                security_begin: config.security_begin,
                security_end: config.security_end,
                standby_duration: config.standby_duration,
                cooldown: 0,
            },
            ModeType::Infinity => Self::Infinity,
        }
    }

    /// Mode variant this policy implements.
    pub fn mode(&self) -> ModeType {
        match self {
            Self::OneWay { .. } => ModeType::OneWay,
            Self::TwoWay { .. } => ModeType::TwoWay,
            Self::Infinity => ModeType::Infinity,
        }
    }

    /// Drop any pending hold. Called when the winch is re-initialized.
    pub fn reset(&mut self) {
        if let Self::TwoWay { cooldown, .. } = self {
            *cooldown = 0;
        }
    }

    /// Hold ticks left (TwoWay only).
    pub fn cooldown(&self) -> u32 {
        match self {
            Self::TwoWay { cooldown, .. } => *cooldown,
            _ => 0,
        }
    }

    /// Whether a margin is reached at `position`.
    pub fn limit_reached(&self, position: Position) -> bool {
        match self {
            Self::OneWay { security_begin } => {
                is_begin_security(position.from_begin, *security_begin)
            }
            Self::TwoWay {
                security_begin,
                security_end,
                ..
            } => {
                is_begin_security(position.from_begin, *security_begin)
                    || is_end_security(position.from_end, *security_end)
            }
            Self::Infinity => false,
        }
    }

    /// Decide this tick's limit actions.
    ///
    /// `running` is true in `Start` and `Running`; `reverse` is the current
    /// relay position.
    pub fn evaluate(&mut self, running: bool, reverse: bool, position: Position) -> PolicyOutcome {
        let mut outcome = PolicyOutcome::default();
        match self {
            Self::OneWay { security_begin } => {
                outcome.request_stop =
                    running && is_begin_security(position.from_begin, *security_begin);
            }
            Self::TwoWay {
                security_begin,
                security_end,
                standby_duration,
                cooldown,
            } => {
                if running {
                    if !reverse && is_begin_security(position.from_begin, *security_begin) {
                        outcome.set_reverse = Some(true);
                        *cooldown = *standby_duration;
                    } else if reverse && is_end_security(position.from_end, *security_end) {
                        outcome.set_reverse = Some(false);
                        *cooldown = *standby_duration;
                    }
                }
                if *cooldown > 0 {
                    *cooldown -= 1;
                    outcome.hold = true;
                }
            }
            Self::Infinity => {}
        }
        outcome
    }
}
