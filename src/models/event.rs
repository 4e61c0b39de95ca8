use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A booked calendar event. Immutable once appended to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    /// Slot label, e.g. "14:00".
    pub time: String,
    pub duration_minutes: i64,
    pub title: String,
}
