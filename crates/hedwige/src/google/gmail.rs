use async_trait::async_trait;
use url::Url;

use hedwige_core::mail::{GmailMessage, MessageList};
use hedwige_core::upstream::{MailApi, Result};

use super::{endpoint, fetch_json};

const DEFAULT_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Gmail v1 client scoped to the authenticated user (`users/me`).
#[derive(Clone)]
pub struct GmailClient {
    client: reqwest::Client,
    base_url: Url,
}

impl GmailClient {
    pub fn new(client: reqwest::Client) -> std::result::Result<Self, url::ParseError> {
        Ok(Self::with_base_url(client, Url::parse(DEFAULT_BASE_URL)?))
    }

    /// Point the client at another server, e.g. a local stub.
    pub fn with_base_url(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl MailApi for GmailClient {
    async fn list_message_ids(
        &self,
        access_token: &str,
        max_results: usize,
    ) -> Result<Vec<String>> {
        let url = endpoint(&self.base_url, &["messages"])?;
        tracing::debug!(max_results, "listing Gmail messages");

        let request = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(&[("maxResults", max_results.to_string())]);

        let list: MessageList = fetch_json(request, "mailbox", "me").await?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    async fn get_message_metadata(
        &self,
        access_token: &str,
        id: &str,
        headers: &[&str],
    ) -> Result<GmailMessage> {
        let url = endpoint(&self.base_url, &["messages", id])?;

        let mut query = vec![("format", "metadata")];
        query.extend(headers.iter().map(|h| ("metadataHeaders", *h)));

        let request = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(&query);

        fetch_json(request, "message", id).await
    }

    async fn get_message(&self, access_token: &str, id: &str) -> Result<GmailMessage> {
        let url = endpoint(&self.base_url, &["messages", id])?;
        let request = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .query(&[("format", "full")]);

        fetch_json(request, "message", id).await
    }
}
