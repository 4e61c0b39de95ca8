use serde::{Deserialize, Serialize};

/// Dialogue intents recognised by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Book,
    Check,
    Cancel,
    Confirm,
    Reject,
    Greeting,
    SelectTime,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Book => "book",
            Intent::Check => "check",
            Intent::Cancel => "cancel",
            Intent::Confirm => "confirm",
            Intent::Reject => "reject",
            Intent::Greeting => "greeting",
            Intent::SelectTime => "select_time",
            Intent::Unknown => "unknown",
        }
    }
}
