pub mod availability;
pub mod calendar;
pub mod clock;
pub mod dialogue;
pub mod extract;
pub mod intent;
