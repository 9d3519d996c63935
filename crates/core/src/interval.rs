use crate::error::TaskError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Allowed refresh periods of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum RefreshInterval {
    One,
    #[default]
    Two,
    Five,
    Ten,
}

impl RefreshInterval {
    pub const ALL: [RefreshInterval; 4] = [
        RefreshInterval::One,
        RefreshInterval::Two,
        RefreshInterval::Five,
        RefreshInterval::Ten,
    ];

    pub fn as_secs(self) -> u64 {
        match self {
            Self::One  => 1,
            Self::Two  => 2,
            Self::Five => 5,
            Self::Ten  => 10,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.as_secs())
    }

    /// Menu label, e.g. `"5 seconds"`.
    pub fn label(self) -> String {
        match self.as_secs() {
            1 => "1 second".to_string(),
            n => format!("{n} seconds"),
        }
    }
}

impl TryFrom<u64> for RefreshInterval {
    type Error = TaskError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_secs() == secs)
            .ok_or_else(|| {
                TaskError::Config(format!(
                    "refresh interval must be 1, 2, 5 or 10 seconds (got {secs})"
                ))
            })
    }
}

impl From<RefreshInterval> for u64 {
    fn from(interval: RefreshInterval) -> Self {
        interval.as_secs()
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_secs())
    }
}
