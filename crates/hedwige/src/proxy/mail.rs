use futures_util::{stream, StreamExt};

use hedwige_core::auth::Session;
use hedwige_core::mail::{
    detail, summarize, MailDetail, MailListing, MAX_RECENT_MAIL, SUMMARY_HEADERS,
};
use hedwige_core::upstream::MailApi;

use crate::error::ApiError;

/// Most recent messages of the session's mailbox, as list rows.
///
/// `limit` is capped at `MAX_RECENT_MAIL`. Metadata fetches run at most
/// `concurrency` at a time and the result keeps the listing order. A failed
/// fetch drops that row and is counted in `MailListing::failed`; only a
/// failed listing call fails the request.
pub async fn list_recent_mail(
    api: &dyn MailApi,
    session: &Session,
    limit: usize,
    concurrency: usize,
) -> Result<MailListing, ApiError> {
    let token = session.access_token.as_str();
    let limit = limit.min(MAX_RECENT_MAIL);

    let ids = api
        .list_message_ids(token, limit)
        .await
        .map_err(ApiError::Upstream)?;

    let results: Vec<_> = stream::iter(ids.into_iter().take(limit))
        .map(|id| async move {
            let result = api.get_message_metadata(token, &id, &SUMMARY_HEADERS).await;
            (id, result)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut listing = MailListing::default();
    for (id, result) in results {
        match result {
            Ok(message) => listing.messages.push(summarize(&message)),
            Err(e) => {
                tracing::warn!(message_id = %id, error = %e, "skipping message");
                listing.failed += 1;
            }
        }
    }

    Ok(listing)
}

/// Subject and decoded plain-text body of one message.
pub async fn get_mail_content(
    api: &dyn MailApi,
    session: &Session,
    id: &str,
) -> Result<MailDetail, ApiError> {
    let message = api.get_message(&session.access_token, id).await?;
    Ok(detail(&message))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use hedwige_core::auth::{IdentityProvider, SessionId};
    use hedwige_core::mail::{GmailMessage, MessageHeader, MessagePart, NO_SUBJECT};
    use hedwige_core::upstream::{ResourceError, Result};

    use super::*;

    /// Mailbox whose messages answer after a delay inversely related to
    /// their position, so completion order differs from listing order.
    #[derive(Default)]
    struct SlowMailbox {
        ids: Vec<String>,
        broken: HashSet<String>,
        fail_listing: bool,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MailApi for SlowMailbox {
        async fn list_message_ids(&self, _token: &str, max: usize) -> Result<Vec<String>> {
            if self.fail_listing {
                return Err(ResourceError::Transport("connection reset".to_string()));
            }
            Ok(self.ids.iter().take(max).cloned().collect())
        }

        async fn get_message_metadata(
            &self,
            _token: &str,
            id: &str,
            _headers: &[&str],
        ) -> Result<GmailMessage> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let position = self.ids.iter().position(|i| i == id).unwrap_or(0);
            let delay = (self.ids.len() - position) as u64 * 5;
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.broken.contains(id) {
                return Err(ResourceError::Status {
                    status: 500,
                    message: "backend error".to_string(),
                });
            }

            Ok(GmailMessage {
                id: id.to_string(),
                payload: Some(MessagePart {
                    headers: vec![MessageHeader {
                        name: "Subject".to_string(),
                        value: format!("subject {id}"),
                    }],
                    ..Default::default()
                }),
                ..Default::default()
            })
        }

        async fn get_message(&self, _token: &str, id: &str) -> Result<GmailMessage> {
            Err(ResourceError::NotFound {
                resource: "message",
                id: id.to_string(),
            })
        }
    }

    fn session() -> Session {
        Session {
            id: SessionId::new("s".to_string()),
            user_id: "1".to_string(),
            display_name: "Test".to_string(),
            email: "test@example.com".to_string(),
            photo_url: None,
            access_token: "token".to_string(),
            provider: IdentityProvider::Google,
            created_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::days(1),
        }
    }

    fn mailbox(n: usize) -> SlowMailbox {
        SlowMailbox {
            ids: (0..n).map(|i| format!("m{i}")).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn keeps_listing_order_and_respects_limit() {
        let api = mailbox(8);

        let listing = list_recent_mail(&api, &session(), 5, 4).await.unwrap();

        let ids: Vec<&str> = listing.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m0", "m1", "m2", "m3", "m4"]);
        assert_eq!(listing.failed, 0);
        assert_eq!(listing.messages[0].subject, "subject m0");
        assert_eq!(listing.messages[0].date, "");
    }

    #[tokio::test]
    async fn oversized_limit_is_capped() {
        let api = mailbox(12);

        let listing = list_recent_mail(&api, &session(), 20, 4).await.unwrap();

        assert_eq!(listing.messages.len(), MAX_RECENT_MAIL);
        assert_eq!(listing.messages[4].id, "m4");
    }

    #[tokio::test]
    async fn bounds_concurrent_fetches() {
        let api = mailbox(6);

        list_recent_mail(&api, &session(), 6, 2).await.unwrap();

        assert!(api.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn isolates_failed_fetches() {
        let mut api = mailbox(5);
        api.broken.insert("m1".to_string());
        api.broken.insert("m3".to_string());

        let listing = list_recent_mail(&api, &session(), 5, 4).await.unwrap();

        let ids: Vec<&str> = listing.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m0", "m2", "m4"]);
        assert_eq!(listing.failed, 2);
    }

    #[tokio::test]
    async fn listing_failure_is_upstream_error() {
        let api = SlowMailbox {
            fail_listing: true,
            ..Default::default()
        };

        let result = list_recent_mail(&api, &session(), 5, 4).await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }

    #[tokio::test]
    async fn empty_mailbox_is_empty_listing() {
        let listing = list_recent_mail(&mailbox(0), &session(), 5, 4)
            .await
            .unwrap();
        assert_eq!(listing, MailListing::default());
    }

    #[tokio::test]
    async fn unknown_message_is_not_found() {
        let result = get_mail_content(&mailbox(1), &session(), "missing").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn placeholder_subject_is_documented_value() {
        assert_eq!(NO_SUBJECT, "(sans sujet)");
    }
}
