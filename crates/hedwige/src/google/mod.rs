//! reqwest clients for the Gmail v1 and Calendar v3 REST APIs.
//!
//! Every request carries the session's OAuth access token as a bearer
//! token. Failures are classified into `ResourceError`; nothing is retried.

mod calendar;
mod gmail;

pub use calendar::CalendarClient;
pub use gmail::GmailClient;

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use hedwige_core::upstream::{ResourceError, Result};

/// Shared HTTP client for both APIs.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// `base` with `segments` appended, each percent-encoded.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ResourceError::Transport(format!("invalid base URL: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a prepared request and decode a JSON body.
///
/// `resource` and `id` name what was asked for, so a 404 can say which
/// object is missing.
async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    resource: &'static str,
    id: &str,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| ResourceError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%status, resource, "upstream request failed");
        return Err(ResourceError::from_status(status.as_u16(), body, resource, id));
    }

    response
        .json()
        .await
        .map_err(|e| ResourceError::Decode(e.to_string()))
}
