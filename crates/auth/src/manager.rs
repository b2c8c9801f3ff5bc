//! Session lifecycle on top of a `SessionRepository`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use hedwige_core::auth::{
    is_flow_stale, is_session_expired, new_session, AuthError, AuthFlowState, Grant,
    IdentityProvider, Result, Session, SessionId, SessionRepository,
};

/// Issues, resolves and terminates sessions.
///
/// Expiry is fixed at creation and enforced lazily on lookup; reading a
/// session never extends it.
#[derive(Clone)]
pub struct SessionManager {
    repository: Arc<dyn SessionRepository>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(repository: Arc<dyn SessionRepository>, ttl: Duration) -> Self {
        Self { repository, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store a new session for a successful grant and return its id.
    pub async fn create_session(&self, grant: Grant) -> Result<SessionId> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::Storage(format!("invalid session TTL: {e}")))?;
        let session = new_session(grant, Utc::now(), ttl);

        self.repository.create_session(&session).await?;
        tracing::info!(
            session = session.id.redacted(),
            user_id = %session.user_id,
            "session created"
        );

        Ok(session.id)
    }

    /// Look up a session, treating expired records as absent.
    pub async fn resolve_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let Some(session) = self.repository.get_session(id).await? else {
            return Ok(None);
        };

        if is_session_expired(&session, Utc::now()) {
            tracing::debug!(session = id.redacted(), "session expired");
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Remove a session. Unknown ids are not an error.
    pub async fn destroy_session(&self, id: &SessionId) -> Result<()> {
        self.repository.delete_session(id).await?;
        tracing::info!(session = id.redacted(), "session destroyed");
        Ok(())
    }

    /// Remember the PKCE verifier for an authorization request.
    pub async fn begin_flow(
        &self,
        state: &str,
        pkce_verifier: String,
        provider: IdentityProvider,
    ) -> Result<()> {
        let flow = AuthFlowState {
            pkce_verifier,
            provider,
            created_at: Utc::now(),
        };
        self.repository.store_auth_flow(state, &flow).await
    }

    /// Consume the flow started with `state`.
    ///
    /// Fails with `InvalidState` when the state is unknown, already used,
    /// stale, or belongs to another provider.
    pub async fn finish_flow(
        &self,
        state: &str,
        provider: IdentityProvider,
    ) -> Result<AuthFlowState> {
        let flow = self
            .repository
            .take_auth_flow(state)
            .await?
            .ok_or(AuthError::InvalidState)?;

        if flow.provider != provider || is_flow_stale(&flow, Utc::now()) {
            return Err(AuthError::InvalidState);
        }

        Ok(flow)
    }
}
