use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tentative booking awaiting an explicit yes/no from the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingBooking {
    pub date: NaiveDate,
    /// Slot label, e.g. "13:00".
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_duration() -> i64 {
    60
}

fn default_title() -> String {
    "Meeting".to_string()
}

/// Per-conversation memory carried between turns.
///
/// Every field is optional/defaulted so a fresh conversation is the empty
/// JSON object `{}` on the wire, and a reset round-trips back to `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "is_false")]
    pub booking_flow: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub checking_availability: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub waiting_for_date: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub waiting_for_time: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub pending_confirmation: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_slots: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_booking: Option<PendingBooking>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl SessionState {
    /// Clear every field. Used on successful booking, cancellation,
    /// greeting, and unrecoverable parse failures during time selection.
    pub fn reset(&mut self) {
        *self = SessionState::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == SessionState::default()
    }
}
