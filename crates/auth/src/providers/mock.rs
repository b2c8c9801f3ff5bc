//! Mock identity provider for development and testing.
//!
//! The authorization URL skips any consent screen and points straight back
//! at the callback with a code that embeds the user's profile.

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use url::Url;

use hedwige_core::auth::{
    build_profile, AuthError, Grant, IdentityProvider, IdentityProviderClient, Profile, Result,
};

#[derive(Debug, Serialize, Deserialize)]
struct MockCode {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    access_token: String,
}

/// Identity provider that never leaves the process.
pub struct MockProvider {
    redirect_uri: Url,
    profile: Profile,
}

impl MockProvider {
    /// Create a provider that logs everyone in as a fixed demo user.
    pub fn new(redirect_uri: Url) -> Self {
        Self {
            redirect_uri,
            profile: Profile {
                subject: "mock-user".to_string(),
                display_name: "Mock User".to_string(),
                email: "mock.user@example.com".to_string(),
                photo_url: None,
            },
        }
    }

    /// Log in as `profile` instead of the default demo user.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Encode the authorization code the callback will receive.
    pub fn code_for(profile: &Profile, access_token: &str) -> String {
        let code = MockCode {
            sub: profile.subject.clone(),
            name: Some(profile.display_name.clone()),
            email: Some(profile.email.clone()),
            picture: profile.photo_url.clone(),
            access_token: access_token.to_string(),
        };
        // Serializing a struct of strings cannot fail.
        let json = serde_json::to_vec(&code).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }
}

#[async_trait]
impl IdentityProviderClient for MockProvider {
    async fn authorization_url(&self, state: &str, _pkce_challenge: &str) -> Result<Url> {
        let token = format!("mock-token-{}", self.profile.subject);
        let mut url = self.redirect_uri.clone();
        url.query_pairs_mut()
            .append_pair("code", &Self::code_for(&self.profile, &token))
            .append_pair("state", state);

        Ok(url)
    }

    async fn exchange_code(&self, code: &str, _pkce_verifier: &str) -> Result<Grant> {
        let decoded = URL_SAFE_NO_PAD
            .decode(code)
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?;

        let code: MockCode =
            serde_json::from_slice(&decoded).map_err(|e| AuthError::CodeExchange(e.to_string()))?;

        let profile = build_profile(code.sub, code.name, code.email, code.picture);
        Ok(Grant::new(profile, code.access_token))
    }

    fn provider(&self) -> IdentityProvider {
        IdentityProvider::Google
    }
}
