use chrono::NaiveDate;

use crate::services::calendar::CalendarStore;

/// First bookable hour of the day.
pub const OPEN_HOUR: u32 = 9;
/// Last bookable hour of the day (slot start, inclusive).
pub const LAST_SLOT_HOUR: u32 = 17;

/// Free "HH:00" slot labels for a date, in grid order. Pure function of the
/// store contents; calling it twice without an intervening booking yields
/// identical lists.
pub fn free_slots(store: &CalendarStore, date: NaiveDate) -> Vec<String> {
    (OPEN_HOUR..=LAST_SLOT_HOUR)
        .map(|hour| format!("{hour:02}:00"))
        .filter(|slot| !store.is_booked(date, slot))
        .collect()
}

/// Human-friendly phrasing of a slot list.
pub fn suggest_slots(free: &[String]) -> String {
    if free.is_empty() {
        "I'm sorry, but I don't have any free slots available.".to_string()
    } else if free.len() <= 3 {
        format!("I have these slots available: {}.", free.join(", "))
    } else {
        format!(
            "I have several slots available, including {} and more.",
            free[..3].join(", ")
        )
    }
}
