//! Application state for auth.

use std::sync::Arc;

use hedwige_core::auth::{IdentityProviderClient, SessionRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::manager::SessionManager;
use crate::providers::GoogleProvider;

/// Shared state for auth handlers and extractors.
///
/// A parent router state exposes it through `axum::extract::FromRef`.
#[derive(Clone)]
pub struct AuthState {
    pub sessions: SessionManager,
    pub config: Arc<AuthConfig>,
    provider: Option<Arc<dyn IdentityProviderClient>>,
}

impl AuthState {
    /// Assemble state from already-built parts.
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        config: AuthConfig,
        provider: Option<Arc<dyn IdentityProviderClient>>,
    ) -> Self {
        Self {
            sessions: SessionManager::new(repository, config.session_ttl),
            config: Arc::new(config),
            provider,
        }
    }

    /// Build state for production, discovering Google when it is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if OIDC discovery fails.
    pub async fn connect(
        repository: Arc<dyn SessionRepository>,
        config: AuthConfig,
    ) -> Result<Self, AuthError> {
        let provider: Option<Arc<dyn IdentityProviderClient>> = match &config.google {
            Some(google) => Some(Arc::new(GoogleProvider::new(google).await?)),
            None => {
                tracing::warn!("GOOGLE_CLIENT_ID not set, /auth/google is disabled");
                None
            }
        };

        Ok(Self::new(repository, config, provider))
    }

    /// The configured identity provider.
    ///
    /// # Errors
    ///
    /// Returns `ProviderNotConfigured` if no provider is enabled.
    pub fn provider(&self) -> Result<&dyn IdentityProviderClient, AuthError> {
        self.provider
            .as_deref()
            .ok_or_else(|| AuthError::ProviderNotConfigured("Google".to_string()))
    }
}
