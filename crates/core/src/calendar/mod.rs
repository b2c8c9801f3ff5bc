mod types;
mod upcoming;

pub use types::{EventQuery, MAX_UPCOMING_EVENTS};
pub use upcoming::{event_start, retain_upcoming};
