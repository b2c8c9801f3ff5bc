use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// Start instant of a Calendar API event.
///
/// Timed events carry `start.dateTime` (RFC 3339); all-day events carry
/// `start.date`, which is taken as midnight UTC.
pub fn event_start(event: &Value) -> Option<DateTime<Utc>> {
    let start = event.get("start")?;

    if let Some(date_time) = start.get("dateTime").and_then(Value::as_str) {
        return DateTime::parse_from_rfc3339(date_time)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }

    start
        .get("date")
        .and_then(Value::as_str)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Enforce the upcoming-events invariant on an `events.list` payload.
///
/// Keeps only `items` that start at or after `now`, sorted ascending by
/// start, at most `cap` of them. Items without a readable start are dropped.
/// All other payload fields pass through untouched.
pub fn retain_upcoming(mut payload: Value, now: DateTime<Utc>, cap: usize) -> Value {
    let Some(items) = payload.get_mut("items").and_then(Value::as_array_mut) else {
        return payload;
    };

    let mut dated: Vec<(DateTime<Utc>, Value)> = items
        .drain(..)
        .filter_map(|item| event_start(&item).map(|start| (start, item)))
        .filter(|(start, _)| *start >= now)
        .collect();

    dated.sort_by_key(|(start, _)| *start);
    dated.truncate(cap);

    items.extend(dated.into_iter().map(|(_, item)| item));
    payload
}
