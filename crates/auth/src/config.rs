use std::time::Duration;

use url::Url;

use crate::error::AuthError;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_COOKIE_NAME: &str = "hedwige.sid";
const DEFAULT_SESSION_TTL_DAYS: u64 = 7;

/// Configuration for the OAuth client registered with the provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: Url,
}

/// Complete auth configuration.
///
/// Built once at startup and shared read-only by every handler.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub google: Option<ProviderConfig>,
    pub session_ttl: Duration,
    /// Public URL of this backend, used to build the OAuth callback.
    pub base_url: Url,
    /// Single origin allowed by CORS and target of every post-auth redirect.
    pub frontend_url: Url,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AUTH_BASE_URL`: Base URL for callback redirects (default: `http://localhost:5000`)
    /// - `FRONTEND_URL`: Frontend origin (default: `http://localhost:3000`)
    /// - `GOOGLE_CLIENT_ID`: Google OAuth client ID (optional, enables Google auth)
    /// - `GOOGLE_CLIENT_SECRET`: Google OAuth client secret (required if Google enabled)
    /// - `SESSION_TTL_DAYS`: Session TTL in days (default: 7)
    /// - `SESSION_COOKIE_NAME`: Session cookie name (default: `hedwige.sid`)
    /// - `COOKIE_SECURE`: Whether to set secure flag on cookies (default: false)
    ///
    /// # Errors
    ///
    /// Returns an error if a URL is malformed or Google is partially configured.
    pub fn from_env() -> Result<Self, AuthError> {
        let base_url = parse_url(
            "AUTH_BASE_URL",
            &std::env::var("AUTH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        )?;
        let frontend_url = parse_url(
            "FRONTEND_URL",
            &std::env::var("FRONTEND_URL").unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
        )?;

        let google = match std::env::var("GOOGLE_CLIENT_ID") {
            Ok(client_id) => {
                let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").map_err(|_| {
                    AuthError::Config(
                        "GOOGLE_CLIENT_SECRET is required when GOOGLE_CLIENT_ID is set".to_string(),
                    )
                })?;
                Some(ProviderConfig {
                    client_id,
                    client_secret: Some(client_secret),
                    redirect_uri: callback_url(&base_url)?,
                })
            }
            Err(_) => None,
        };

        let session_ttl = std::env::var("SESSION_TTL_DAYS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(days)
            .unwrap_or(days(DEFAULT_SESSION_TTL_DAYS));

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let cookie_name = std::env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());

        Ok(Self {
            google,
            session_ttl,
            base_url,
            frontend_url,
            cookie_name,
            cookie_secure,
        })
    }

    /// Configuration suitable for tests and local development.
    pub fn local(base_url: Url, frontend_url: Url) -> Self {
        Self {
            google: None,
            session_ttl: days(DEFAULT_SESSION_TTL_DAYS),
            base_url,
            frontend_url,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: false,
        }
    }

    /// Absolute URL of the Google OAuth callback on this backend.
    pub fn callback_url(&self) -> Result<Url, AuthError> {
        callback_url(&self.base_url)
    }

    /// Frontend origin as sent in the `Origin` header (no trailing slash).
    pub fn frontend_origin(&self) -> String {
        self.frontend_url.origin().ascii_serialization()
    }
}

fn days(n: u64) -> Duration {
    Duration::from_secs(n * 24 * 60 * 60)
}

fn parse_url(name: &str, value: &str) -> Result<Url, AuthError> {
    value
        .parse()
        .map_err(|e| AuthError::Config(format!("{name} must be a valid URL: {e}")))
}

fn callback_url(base_url: &Url) -> Result<Url, AuthError> {
    base_url
        .join("/auth/google/callback")
        .map_err(|e| AuthError::Config(e.to_string()))
}
