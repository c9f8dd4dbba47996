//! Event types a webhook can subscribe to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A platform event that triggers a webhook delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    SessionStart,
    SessionUpdate,
    SessionStop,
    OperationalStatus,
    ConnectivityStatus,
    ChargepointBooted,
    CdrCreated,
}

impl EventType {
    /// Every supported event type
    pub const ALL: [Self; 7] = [
        Self::SessionStart,
        Self::SessionUpdate,
        Self::SessionStop,
        Self::OperationalStatus,
        Self::ConnectivityStatus,
        Self::ChargepointBooted,
        Self::CdrCreated,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStart => "SESSION_START",
            Self::SessionUpdate => "SESSION_UPDATE",
            Self::SessionStop => "SESSION_STOP",
            Self::OperationalStatus => "OPERATIONAL_STATUS",
            Self::ConnectivityStatus => "CONNECTIVITY_STATUS",
            Self::ChargepointBooted => "CHARGEPOINT_BOOTED",
            Self::CdrCreated => "CDR_CREATED",
        }
    }

    /// Comma-separated list of every wire name, for error messages
    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A string that is not a supported event type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported event type \"{0}\"")]
pub struct UnsupportedEventType(pub String);

impl FromStr for EventType {
    type Err = UnsupportedEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnsupportedEventType(s.to_string()))
    }
}
