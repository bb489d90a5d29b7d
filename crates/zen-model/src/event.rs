//! Community event records (`/data/events.json`)

use crate::lenient::{self, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Community event listing entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// ISO date or datetime as published
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    /// Event title
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    /// Description
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub description: String,
    /// Venue
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub location: String,
    /// Registration or details link
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub link: String,
}

impl EventRecord {
    /// Create a titled event with an optional date
    #[must_use]
    pub fn new(title: impl Into<String>, date: Option<&str>) -> Self {
        Self {
            date: date.map(str::to_owned),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Parsed schedule, if the date is present and valid
    #[inline]
    #[must_use]
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

/// Decode the events document.
///
/// Non-array documents yield nothing; entries without a title or that fail to
/// decode are dropped.
#[must_use]
pub fn parse_event_document(document: Value) -> Vec<EventRecord> {
    let Value::Array(items) = document else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<EventRecord>(item).ok())
        .filter(|event| !event.title.trim().is_empty())
        .collect()
}
