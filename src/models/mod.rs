pub mod event;
pub mod intent;
pub mod session;

pub use event::CalendarEvent;
pub use intent::Intent;
pub use session::{PendingBooking, SessionState};
