mod error;
mod traits;

pub use error::{ResourceError, Result};
pub use traits::{CalendarApi, MailApi};
