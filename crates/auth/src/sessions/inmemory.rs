//! In-memory session storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use hedwige_core::auth::{
    is_flow_stale, is_session_expired, AuthFlowState, Result, Session, SessionId,
    SessionRepository,
};

/// In-memory session store for development and testing.
///
/// Stores sessions and auth flow state in HashMaps wrapped in `Arc<RwLock<_>>`.
/// Data is not persisted and is lost when the process exits. Expired sessions
/// are dropped on each insert and stale flows on each new flow.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    auth_flows: Arc<RwLock<HashMap<String, AuthFlowState>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Number of pending auth flows.
    pub async fn flow_count(&self) -> usize {
        self.auth_flows.read().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn create_session(&self, session: &Session) -> Result<()> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| !is_session_expired(existing, now));
        sessions.insert(session.id.as_str().to_string(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id.as_str()).cloned())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id.as_str());
        Ok(())
    }

    async fn store_auth_flow(&self, state: &str, flow: &AuthFlowState) -> Result<()> {
        let now = Utc::now();
        let mut flows = self.auth_flows.write().await;
        flows.retain(|_, pending| !is_flow_stale(pending, now));
        flows.insert(state.to_string(), flow.clone());
        Ok(())
    }

    async fn take_auth_flow(&self, state: &str) -> Result<Option<AuthFlowState>> {
        let mut flows = self.auth_flows.write().await;
        Ok(flows.remove(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedwige_core::auth::IdentityProvider;

    fn test_session(id: &str, user_id: &str) -> Session {
        Session {
            id: SessionId::new(id.to_string()),
            user_id: user_id.to_string(),
            display_name: "Luna Lovegood".to_string(),
            email: "luna@hogwarts.uk".to_string(),
            photo_url: None,
            access_token: "token".to_string(),
            provider: IdentityProvider::Google,
            created_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::hours(24),
        }
    }

    fn test_flow(verifier: &str) -> AuthFlowState {
        AuthFlowState {
            pkce_verifier: verifier.to_string(),
            provider: IdentityProvider::Google,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_session_create_and_get() {
        let store = InMemorySessionStore::new();
        store
            .create_session(&test_session("session-1", "user-123"))
            .await
            .unwrap();

        let retrieved = store
            .get_session(&SessionId::new("session-1".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.user_id, "user-123");
        assert_eq!(retrieved.email, "luna@hogwarts.uk");
    }

    #[tokio::test]
    async fn test_session_get_nonexistent() {
        let store = InMemorySessionStore::new();
        let result = store
            .get_session(&SessionId::new("nonexistent".to_string()))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_session_delete_is_idempotent() {
        let store = InMemorySessionStore::new();
        let id = SessionId::new("session-1".to_string());
        store
            .create_session(&test_session("session-1", "user-123"))
            .await
            .unwrap();

        store.delete_session(&id).await.unwrap();
        store.delete_session(&id).await.unwrap();

        assert!(store.get_session(&id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_auth_flow_is_taken_once() {
        let store = InMemorySessionStore::new();
        store
            .store_auth_flow("state-abc", &test_flow("verifier"))
            .await
            .unwrap();

        let first = store.take_auth_flow("state-abc").await.unwrap();
        assert_eq!(first.unwrap().pkce_verifier, "verifier");
        assert!(store.take_auth_flow("state-abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_auth_flow_overwrite() {
        let store = InMemorySessionStore::new();
        store
            .store_auth_flow("same-state", &test_flow("verifier-1"))
            .await
            .unwrap();
        store
            .store_auth_flow("same-state", &test_flow("verifier-2"))
            .await
            .unwrap();

        let retrieved = store.take_auth_flow("same-state").await.unwrap().unwrap();
        assert_eq!(retrieved.pkce_verifier, "verifier-2");
    }

    #[tokio::test]
    async fn test_new_flow_drops_stale_flows() {
        let store = InMemorySessionStore::new();
        let mut stale = test_flow("old-verifier");
        stale.created_at = Utc::now() - chrono::Duration::minutes(30);
        store.store_auth_flow("old-state", &stale).await.unwrap();

        for i in 0..3 {
            store
                .store_auth_flow(&format!("state-{i}"), &test_flow("verifier"))
                .await
                .unwrap();
        }

        assert_eq!(store.flow_count().await, 3);
        assert!(store.take_auth_flow("old-state").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_drops_expired_sessions() {
        let store = InMemorySessionStore::new();
        let mut expired = test_session("expired", "user-1");
        expired.expires_at = Utc::now() - chrono::Duration::seconds(1);
        store.create_session(&expired).await.unwrap();

        store
            .create_session(&test_session("fresh", "user-2"))
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store
            .get_session(&SessionId::new("expired".to_string()))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store = InMemorySessionStore::new();
        let clone = store.clone();

        store
            .create_session(&test_session("session-1", "user-123"))
            .await
            .unwrap();

        assert_eq!(clone.len().await, 1);
    }
}
