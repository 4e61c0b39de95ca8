use chrono::NaiveDateTime;

use crate::models::{Intent, SessionState};
use crate::services::extract;

const BOOKING_WORDS: &[&str] = &["book", "schedule", "meeting", "call", "appointment", "reserve"];
const AVAILABILITY_WORDS: &[&str] = &[
    "free",
    "available",
    "availability",
    "slots",
    "open",
    "have time",
    "free time",
    "check availability",
];
const CANCEL_WORDS: &[&str] = &["cancel", "remove", "delete", "unbook"];
const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "greetings"];
const CONFIRM_WORDS: &[&str] = &["yes", "yeah", "sure", "ok", "okay", "confirm"];
// "cancel" is also a rejection word; the cancel set is checked first and
// always wins. Kept as-is for compatibility with the shipped behaviour.
const REJECT_WORDS: &[&str] = &["no", "nope", "not", "cancel"];

/// Classify an utterance given the current session state. State-aware
/// overrides run before the generic keyword rules; first match wins.
pub fn classify(text: &str, state: &SessionState, now: NaiveDateTime) -> Intent {
    let text_lower = text.trim().to_lowercase();

    // A bare 1-2 digit reply while a slot choice is expected is a time
    // selection, not a date or a booking request.
    let expecting_slot_choice = state.waiting_for_time
        || (state.availability_date.is_some() && state.available_slots.is_some());
    if expecting_slot_choice && extract::is_bare_number(&text_lower) {
        return Intent::SelectTime;
    }

    if state.booking_flow {
        let (date, time) = extract::extract(&text_lower, now);
        if date.is_some() || time.is_some() {
            return Intent::Book;
        }
    }

    if state.checking_availability {
        let (date, _) = extract::extract(&text_lower, now);
        if date.is_some() {
            return Intent::Check;
        }
    }

    if contains_any(&text_lower, BOOKING_WORDS) {
        Intent::Book
    } else if contains_any(&text_lower, AVAILABILITY_WORDS) {
        Intent::Check
    } else if contains_any(&text_lower, CANCEL_WORDS) {
        Intent::Cancel
    } else if contains_any(&text_lower, GREETING_WORDS) {
        Intent::Greeting
    } else if contains_any(&text_lower, CONFIRM_WORDS) {
        Intent::Confirm
    } else if contains_any(&text_lower, REJECT_WORDS) {
        Intent::Reject
    } else {
        Intent::Unknown
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}
