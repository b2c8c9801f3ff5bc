use async_trait::async_trait;
use url::Url;

use super::{AuthError, AuthFlowState, Grant, IdentityProvider, Session, SessionId};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Abstraction over OAuth2/OIDC identity providers.
#[async_trait]
pub trait IdentityProviderClient: Send + Sync {
    /// Generate authorization URL for user redirect.
    async fn authorization_url(&self, state: &str, pkce_challenge: &str) -> Result<Url>;

    /// Exchange authorization code for a profile and an access token.
    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> Result<Grant>;

    /// Which provider this client represents.
    fn provider(&self) -> IdentityProvider;
}

/// Session storage abstraction.
///
/// Implementations must be safe to call concurrently; each operation is
/// atomic per key from the caller's point of view.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new session.
    async fn create_session(&self, session: &Session) -> Result<()>;

    /// Retrieve session by ID. Expiry is checked by the caller.
    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Delete a specific session. Deleting an unknown id is not an error.
    async fn delete_session(&self, id: &SessionId) -> Result<()>;

    /// Store PKCE/state for auth flow (short TTL).
    async fn store_auth_flow(&self, state: &str, flow: &AuthFlowState) -> Result<()>;

    /// Retrieve and delete auth flow state.
    async fn take_auth_flow(&self, state: &str) -> Result<Option<AuthFlowState>>;
}
