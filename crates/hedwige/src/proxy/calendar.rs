use chrono::{DateTime, Utc};
use serde_json::Value;

use hedwige_core::auth::Session;
use hedwige_core::calendar::{retain_upcoming, EventQuery, MAX_UPCOMING_EVENTS};
use hedwige_core::upstream::CalendarApi;

use crate::error::ApiError;

/// Primary-calendar events starting at or after `now`, soonest first.
///
/// The query already asks Google for this; the payload is filtered again so
/// the guarantee holds whatever the provider returns.
pub async fn list_upcoming_events(
    api: &dyn CalendarApi,
    session: &Session,
    now: DateTime<Utc>,
) -> Result<Value, ApiError> {
    let query = EventQuery::upcoming(now);

    let payload = api
        .list_events(&session.access_token, &query)
        .await
        .map_err(ApiError::Upstream)?;

    Ok(retain_upcoming(payload, now, MAX_UPCOMING_EVENTS))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use hedwige_core::auth::{IdentityProvider, SessionId};
    use hedwige_core::upstream::{ResourceError, Result};
    use serde_json::json;

    use super::*;

    struct RecordingCalendar {
        payload: Value,
        seen: Mutex<Option<(String, EventQuery)>>,
    }

    #[async_trait]
    impl CalendarApi for RecordingCalendar {
        async fn list_events(&self, token: &str, query: &EventQuery) -> Result<Value> {
            *self.seen.lock().unwrap() = Some((token.to_string(), query.clone()));
            Ok(self.payload.clone())
        }
    }

    struct DownCalendar;

    #[async_trait]
    impl CalendarApi for DownCalendar {
        async fn list_events(&self, _token: &str, _query: &EventQuery) -> Result<Value> {
            Err(ResourceError::Unauthorized("token expired".to_string()))
        }
    }

    fn session() -> Session {
        Session {
            id: SessionId::new("s".to_string()),
            user_id: "1".to_string(),
            display_name: "Test".to_string(),
            email: "test@example.com".to_string(),
            photo_url: None,
            access_token: "ya29.calendar".to_string(),
            provider: IdentityProvider::Google,
            created_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::days(1),
        }
    }

    #[tokio::test]
    async fn queries_primary_calendar_from_now_with_session_token() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let api = RecordingCalendar {
            payload: json!({"kind": "calendar#events", "items": []}),
            seen: Mutex::new(None),
        };

        let payload = list_upcoming_events(&api, &session(), now).await.unwrap();

        let (token, query) = api.seen.lock().unwrap().clone().unwrap();
        assert_eq!(token, "ya29.calendar");
        assert_eq!(query, EventQuery::upcoming(now));
        assert_eq!(payload["kind"], "calendar#events");
    }

    #[tokio::test]
    async fn drops_past_events_and_sorts() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let api = RecordingCalendar {
            payload: json!({"items": [
                {"id": "late", "start": {"dateTime": "2024-03-02T09:00:00Z"}},
                {"id": "past", "start": {"dateTime": "2024-02-28T09:00:00Z"}},
                {"id": "soon", "start": {"dateTime": "2024-03-01T10:00:00+00:00"}},
            ]}),
            seen: Mutex::new(None),
        };

        let payload = list_upcoming_events(&api, &session(), now).await.unwrap();

        let ids: Vec<&str> = payload["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["soon", "late"]);
    }

    #[tokio::test]
    async fn rejected_token_is_upstream_failure() {
        let result = list_upcoming_events(&DownCalendar, &session(), Utc::now()).await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }
}
