//! Mode variants: the limit-handling policy selected at boot.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Limit-handling policy of the winch, immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModeType {
    /// Pull toward the drum, soft stop near the begin-side limit.
    #[default]
    OneWay,
    /// Shuttle between both limits, reversing after a dwell.
    TwoWay,
    /// No positional limits.
    Infinity,
}

impl ModeType {
    /// All variants, in declaration order.
    pub const ALL: [ModeType; 3] = [Self::OneWay, Self::TwoWay, Self::Infinity];

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneWay => "One Way",
            Self::TwoWay => "Two Way",
            Self::Infinity => "Infinity",
        }
    }
}

impl fmt::Display for ModeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModeType {
    type Err = ConfigError;

    /// Accepts `one_way`, `OneWay`, `one-way` and the legacy `ModeType.OneWay`
    /// spelling, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let name = raw.strip_prefix("ModeType.").unwrap_or(raw);
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "oneway" => Ok(Self::OneWay),
            "twoway" => Ok(Self::TwoWay),
            "infinity" => Ok(Self::Infinity),
            _ => Err(ConfigError::UnknownMode(raw.to_string())),
        }
    }
}
