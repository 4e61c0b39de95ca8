use chrono::NaiveDate;

use crate::models::CalendarEvent;

/// Append-only in-memory collection of booked events.
///
/// Owned by the caller and handed to the dialogue engine explicitly; sharing
/// a store across sessions requires wrapping it in a lock, since two turns
/// could otherwise both see a slot as free and book it.
#[derive(Debug, Default)]
pub struct CalendarStore {
    events: Vec<CalendarEvent>,
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    /// Events on the given date, in insertion order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    pub fn is_booked(&self, date: NaiveDate, time: &str) -> bool {
        self.events.iter().any(|e| e.date == date && e.time == time)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
