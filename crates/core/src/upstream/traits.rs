use async_trait::async_trait;
use serde_json::Value;

use super::Result;
use crate::calendar::EventQuery;
use crate::mail::GmailMessage;

/// Read-only access to a user's mailbox.
///
/// Every call is authorised by the caller-supplied OAuth access token.
#[async_trait]
pub trait MailApi: Send + Sync {
    /// Most recent message ids, in provider order.
    async fn list_message_ids(&self, access_token: &str, max_results: usize)
        -> Result<Vec<String>>;

    /// Message with only the requested headers (no body).
    async fn get_message_metadata(
        &self,
        access_token: &str,
        id: &str,
        headers: &[&str],
    ) -> Result<GmailMessage>;

    /// Full message including MIME parts and body data.
    async fn get_message(&self, access_token: &str, id: &str) -> Result<GmailMessage>;
}

/// Read-only access to a user's calendars.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Raw `events.list` payload for the query.
    async fn list_events(&self, access_token: &str, query: &EventQuery) -> Result<Value>;
}
