use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of events returned by the upcoming-events listing.
pub const MAX_UPCOMING_EVENTS: usize = 10;

/// Parameters of a Google Calendar `events.list` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub max_results: usize,
    /// Expand recurring events into single occurrences.
    pub single_events: bool,
    pub order_by: String,
}

impl EventQuery {
    /// Events on the primary calendar starting from `now`, soonest first.
    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            calendar_id: "primary".to_string(),
            time_min: now,
            max_results: MAX_UPCOMING_EVENTS,
            single_events: true,
            order_by: "startTime".to_string(),
        }
    }

    /// Query string pairs in the form the Calendar API expects.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "timeMin",
                self.time_min.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            ("maxResults", self.max_results.to_string()),
            ("singleEvents", self.single_events.to_string()),
            ("orderBy", self.order_by.clone()),
        ]
    }
}
