use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cryptographically random session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix that is safe to put in logs.
    pub fn redacted(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(6)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProvider {
    Google,
}

impl std::fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
        }
    }
}

impl std::str::FromStr for IdentityProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// Authenticated user session.
///
/// The access token lives only here, on the server side. Nothing that is
/// serialized towards a client is built directly from this struct.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub access_token: String,
    pub provider: IdentityProvider,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id.redacted())
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("photo_url", &self.photo_url)
            .field("access_token", &"[redacted]")
            .field("provider", &self.provider)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// User identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Provider's unique user identifier.
    pub subject: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
}

/// Result of a successful authorization-code exchange.
#[derive(Clone)]
pub struct Grant {
    pub profile: Profile,
    pub access_token: String,
    pub provider: IdentityProvider,
}

impl Grant {
    pub fn new(profile: Profile, access_token: impl Into<String>) -> Self {
        Self {
            profile,
            access_token: access_token.into(),
            provider: IdentityProvider::Google,
        }
    }
}

impl std::fmt::Debug for Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grant")
            .field("profile", &self.profile)
            .field("access_token", &"[redacted]")
            .field("provider", &self.provider)
            .finish()
    }
}

/// PKCE verifier stored under the OAuth `state` during the consent round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthFlowState {
    pub pkce_verifier: String,
    pub provider: IdentityProvider,
    pub created_at: DateTime<Utc>,
}

/// What `/me` tells the frontend about the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: String,
}

impl From<&Session> for MeView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.user_id.clone(),
            name: session.display_name.clone(),
            email: session.email.clone(),
            photo: session.photo_url.clone().unwrap_or_default(),
        }
    }
}
