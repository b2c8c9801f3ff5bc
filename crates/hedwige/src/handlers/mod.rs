pub mod calendar;
pub mod gmail;
pub mod health;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use hedwige_auth::{AuthState, CurrentSession};
use hedwige_core::auth::Session;

use crate::error::ApiError;

/// Guard for the proxy routes: the request's session, or a 401.
pub struct RequireSession(pub Session);

impl<S> FromRequestParts<S> for RequireSession
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        Ok(RequireSession(session))
    }
}
