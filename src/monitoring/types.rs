//! Notification event types.

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Free-form structured context attached to an event.
pub type Details = serde_json::Map<String, serde_json::Value>;

/// Severity of a notification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            other => Err(EventError::UnknownLevel(other.to_string())),
        }
    }
}

/// A structured record of an operational error. Immutable once created.
///
/// Serializes to exactly the webhook payload fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub source: String,
    pub message: String,
    pub details: Details,
}

/// Result of a single webhook delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No webhook configured; nothing was sent.
    Skipped,
    /// The endpoint accepted the payload.
    Delivered,
    /// Transport error, timeout or non-success status.
    Failed(String),
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Skipped => "skipped",
            DispatchOutcome::Delivered => "delivered",
            DispatchOutcome::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Errors building events.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("unknown level '{0}' (expected info, warning or error)")]
    UnknownLevel(String),

    #[error("details must serialize to a JSON object, got {0}")]
    DetailsNotObject(&'static str),

    #[error("details are not serializable: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!("error".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!(" info ".parse::<Level>().unwrap(), Level::Info);
        assert!("fatal".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Warning).unwrap(), "\"warning\"");
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(DispatchOutcome::Skipped.to_string(), "skipped");
        assert_eq!(
            DispatchOutcome::Failed("HTTP 500".into()).to_string(),
            "failed: HTTP 500"
        );
    }
}
