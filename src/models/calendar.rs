use serde::{Deserialize, Serialize};

use super::enums::CalendarEventType;

/// A journal entry. `date` is `YYYY-MM-DD`, `time` is `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: CalendarEventType,
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Input for a manually created journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    #[serde(rename = "type")]
    pub event_type: CalendarEventType,
    pub title: String,
    pub date: String,
    pub time: Option<String>,
    pub notes: Option<String>,
}
