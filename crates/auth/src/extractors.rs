//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;

use hedwige_core::auth::{Session, SessionId};

use crate::{error::AuthError, AuthState};

/// Extractor for an authenticated session. Rejects with 401 otherwise.
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let session_id = session_id_from_headers(&parts.headers, &auth_state.config.cookie_name)
            .ok_or(AuthError::Unauthenticated)?;

        auth_state
            .sessions
            .resolve_session(&session_id)
            .await?
            .map(CurrentSession)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Session id from `Authorization: Bearer`, falling back to the session cookie.
pub(crate) fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(SessionId::new(token.to_string()));
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(|value| SessionId::new(value.to_string()))
}
