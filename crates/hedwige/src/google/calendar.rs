use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use hedwige_core::calendar::EventQuery;
use hedwige_core::upstream::{CalendarApi, Result};

use super::{endpoint, fetch_json};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar v3 client.
#[derive(Clone)]
pub struct CalendarClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CalendarClient {
    pub fn new(client: reqwest::Client) -> std::result::Result<Self, url::ParseError> {
        Ok(Self::with_base_url(client, Url::parse(DEFAULT_BASE_URL)?))
    }

    pub fn with_base_url(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl CalendarApi for CalendarClient {
    async fn list_events(&self, access_token: &str, query: &EventQuery) -> Result<Value> {
        let url = endpoint(
            &self.base_url,
            &["calendars", &query.calendar_id, "events"],
        )?;
        tracing::debug!(
            calendar = %query.calendar_id,
            time_min = %query.time_min,
            "listing Calendar events"
        );

        let request = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(&query.to_query_pairs());

        fetch_json(request, "calendar", &query.calendar_id).await
    }
}
