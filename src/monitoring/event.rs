//! Event formatting.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::monitoring::types::{Details, EventError, Level, NotificationEvent};

/// Build an event stamped with the current instant.
pub fn format(
    level: Level,
    source: impl Into<String>,
    message: impl Into<String>,
    details: Details,
) -> NotificationEvent {
    NotificationEvent {
        timestamp: Utc::now(),
        level,
        source: source.into(),
        message: message.into(),
        details,
    }
}

/// Convert any serializable value into event details.
///
/// `null` becomes an empty mapping; anything other than an object is rejected.
pub fn details_from<T: Serialize>(value: &T) -> Result<Details, EventError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Details::new()),
        Value::Bool(_) => Err(EventError::DetailsNotObject("a boolean")),
        Value::Number(_) => Err(EventError::DetailsNotObject("a number")),
        Value::String(_) => Err(EventError::DetailsNotObject("a string")),
        Value::Array(_) => Err(EventError::DetailsNotObject("an array")),
    }
}
