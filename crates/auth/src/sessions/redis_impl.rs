//! Redis session storage implementation.

use std::time::Duration;

use async_trait::async_trait;
use fred::prelude::*;

use hedwige_core::auth::{
    AuthError, AuthFlowState, Result, Session, SessionId, SessionRepository, AUTH_FLOW_TTL,
};

/// Redis-backed session storage.
///
/// Records expire through `EX`; the session manager still checks
/// `expires_at` on every lookup.
pub struct RedisSessionStore {
    pool: Pool,
    session_ttl: Duration,
    flow_ttl: Duration,
}

impl RedisSessionStore {
    /// Creates a new Redis session store.
    ///
    /// # Arguments
    ///
    /// * `pool` - Redis connection pool
    /// * `session_ttl` - TTL for session data
    pub fn new(pool: Pool, session_ttl: Duration) -> Self {
        Self {
            pool,
            session_ttl,
            flow_ttl: Duration::from_secs(AUTH_FLOW_TTL.num_seconds().unsigned_abs()),
        }
    }

    fn session_key(id: &SessionId) -> String {
        format!("hedwige:session:{id}")
    }

    fn flow_key(state: &str) -> String {
        format!("hedwige:auth_flow:{state}")
    }

    async fn set_json<T: serde::Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let value = serde_json::to_string(value).map_err(|e| AuthError::Storage(e.to_string()))?;

        self.pool
            .set::<(), _, _>(
                key,
                value,
                Some(Expiration::EX(ttl.as_secs() as i64)),
                None,
                false,
            )
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }
}

#[async_trait]
impl SessionRepository for RedisSessionStore {
    async fn create_session(&self, session: &Session) -> Result<()> {
        self.set_json(&Self::session_key(&session.id), session, self.session_ttl)
            .await
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let value: Option<String> = self
            .pool
            .get(Self::session_key(id))
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        value
            .map(|json| serde_json::from_str(&json).map_err(|e| AuthError::Storage(e.to_string())))
            .transpose()
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        self.pool
            .del::<(), _>(Self::session_key(id))
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    async fn store_auth_flow(&self, state: &str, flow: &AuthFlowState) -> Result<()> {
        self.set_json(&Self::flow_key(state), flow, self.flow_ttl)
            .await
    }

    async fn take_auth_flow(&self, state: &str) -> Result<Option<AuthFlowState>> {
        let value: Option<String> = self
            .pool
            .getdel(Self::flow_key(state))
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        value
            .map(|json| serde_json::from_str(&json).map_err(|e| AuthError::Storage(e.to_string())))
            .transpose()
    }
}
