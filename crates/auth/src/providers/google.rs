//! Google OIDC provider implementation.

use async_trait::async_trait;
use openidconnect::{
    core::{CoreAuthPrompt, CoreAuthenticationFlow, CoreClient, CoreProviderMetadata},
    reqwest, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointMaybeSet,
    EndpointNotSet, EndpointSet, IssuerUrl, Nonce, OAuth2TokenResponse, PkceCodeVerifier,
    RedirectUrl, Scope, TokenResponse,
};
use url::Url;

use hedwige_core::auth::{
    build_profile, generate_state, AuthError, Grant, IdentityProvider, IdentityProviderClient,
    Result,
};

use crate::config::ProviderConfig;

const GOOGLE_ISSUER: &str = "https://accounts.google.com";

/// Scopes requested on the consent screen.
const SCOPES: [&str; 5] = [
    "openid",
    "email",
    "profile",
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/calendar.readonly",
];

/// A `CoreClient` configured from discovery metadata.
///
/// `from_provider_metadata` always sets the auth URL; token and userinfo
/// endpoints depend on what discovery returned.
type ConfiguredCoreClient = CoreClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

/// Google OIDC provider.
pub struct GoogleProvider {
    client: ConfiguredCoreClient,
    http_client: reqwest::Client,
}

impl GoogleProvider {
    /// Create a new Google provider by discovering the OIDC metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails or the redirect URI is invalid.
    pub async fn new(config: &ProviderConfig) -> Result<Self> {
        let issuer_url = IssuerUrl::new(GOOGLE_ISSUER.to_string())
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        // Redirects are never followed while talking to the provider.
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Provider(format!("Failed to build HTTP client: {e}")))?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer_url, &http_client)
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let client = CoreClient::from_provider_metadata(
            provider_metadata,
            ClientId::new(config.client_id.clone()),
            config.client_secret.clone().map(ClientSecret::new),
        )
        .set_redirect_uri(
            RedirectUrl::new(config.redirect_uri.to_string())
                .map_err(|e| AuthError::Provider(e.to_string()))?,
        );

        tracing::info!(redirect_uri = %config.redirect_uri, "Google provider ready");

        Ok(Self {
            client,
            http_client,
        })
    }
}

#[async_trait]
impl IdentityProviderClient for GoogleProvider {
    async fn authorization_url(&self, state: &str, pkce_challenge: &str) -> Result<Url> {
        let state = state.to_string();

        // The challenge is computed by the caller, which keeps the verifier.
        let mut request = self.client.authorize_url(
            CoreAuthenticationFlow::AuthorizationCode,
            move || CsrfToken::new(state),
            || Nonce::new(generate_state()),
        );
        for scope in SCOPES {
            request = request.add_scope(Scope::new(scope.to_string()));
        }

        let (auth_url, _csrf_token, _nonce) = request
            .add_prompt(CoreAuthPrompt::Consent)
            .add_extra_param("access_type", "offline")
            .add_extra_param("code_challenge", pkce_challenge.to_string())
            .add_extra_param("code_challenge_method", "S256")
            .url();

        Ok(auth_url)
    }

    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> Result<Grant> {
        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| AuthError::InvalidToken("No ID token in response".to_string()))?;

        let claims = id_token
            .claims(&self.client.id_token_verifier(), |_: Option<&Nonce>| Ok(()))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let profile = build_profile(
            claims.subject().as_str().to_string(),
            claims
                .name()
                .and_then(|n| n.get(None))
                .map(|n| n.as_str().to_string()),
            claims.email().map(|e| e.as_str().to_string()),
            claims
                .picture()
                .and_then(|p| p.get(None))
                .map(|p| p.as_str().to_string()),
        );

        if profile.email.is_empty() {
            return Err(AuthError::MissingClaim("email".to_string()));
        }

        Ok(Grant::new(
            profile,
            token_response.access_token().secret().clone(),
        ))
    }

    fn provider(&self) -> IdentityProvider {
        IdentityProvider::Google
    }
}
