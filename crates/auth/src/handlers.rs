//! HTTP handlers for auth routes.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use openidconnect::PkceCodeChallenge;
use serde::Deserialize;

use hedwige_core::auth::{generate_state, IdentityProvider, MeView, SessionId};

use crate::error::AuthError;
use crate::extractors::{session_id_from_headers, CurrentSession};
use crate::AuthState;

/// Query parameters Google appends to the callback URL.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the user denies consent.
    pub error: Option<String>,
}

/// Creates the auth router with all authentication routes.
///
/// Routes:
/// - `GET /auth/google` - Redirect to the Google consent screen
/// - `GET /auth/google/callback` - Exchange the code and open a session
/// - `GET /logout` - End the current session, if any
/// - `GET /me` - Profile of the current user
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
        .route("/logout", get(logout))
        .route("/me", get(me))
}

async fn google_login(State(state): State<AuthState>) -> Result<Redirect, AuthError> {
    let provider = state.provider()?;

    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
    let csrf_state = generate_state();

    state
        .sessions
        .begin_flow(
            &csrf_state,
            pkce_verifier.secret().to_string(),
            IdentityProvider::Google,
        )
        .await?;

    let auth_url = provider
        .authorization_url(&csrf_state, pkce_challenge.as_str())
        .await?;

    Ok(Redirect::to(auth_url.as_str()))
}

async fn google_callback(
    State(state): State<AuthState>,
    Query(params): Query<CallbackQuery>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let frontend = Redirect::to(state.config.frontend_url.as_str());

    match complete_login(&state, params).await {
        Ok(session_id) => (jar.add(session_cookie(&state, session_id)), frontend),
        Err(e) => {
            tracing::warn!(error = %e, "login failed, no session created");
            (jar, frontend)
        }
    }
}

async fn complete_login(state: &AuthState, params: CallbackQuery) -> Result<SessionId, AuthError> {
    if let Some(error) = params.error {
        return Err(AuthError::Core(
            hedwige_core::auth::AuthError::CodeExchange(format!("consent refused: {error}")),
        ));
    }

    let csrf_state = params
        .state
        .ok_or(AuthError::Core(hedwige_core::auth::AuthError::InvalidState))?;
    let code = params.code.ok_or_else(|| {
        AuthError::Core(hedwige_core::auth::AuthError::CodeExchange(
            "missing authorization code".to_string(),
        ))
    })?;

    let flow = state
        .sessions
        .finish_flow(&csrf_state, IdentityProvider::Google)
        .await?;

    let grant = state
        .provider()?
        .exchange_code(&code, &flow.pkce_verifier)
        .await?;

    Ok(state.sessions.create_session(grant).await?)
}

fn session_cookie(state: &AuthState, session_id: SessionId) -> Cookie<'static> {
    Cookie::build((state.config.cookie_name.clone(), session_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.config.session_ttl.as_secs() as i64
        ))
        .build()
}

async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let frontend = Redirect::to(state.config.frontend_url.as_str());
    let cookie_name = state.config.cookie_name.clone();

    if let Some(session_id) = session_id_from_headers(&headers, &cookie_name) {
        if let Err(e) = state.sessions.destroy_session(&session_id).await {
            tracing::error!(
                error = %e,
                session = session_id.redacted(),
                "failed to destroy session"
            );
        }
    }

    if jar.get(&cookie_name).is_none() {
        return (jar, frontend);
    }

    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/"));
    (jar, frontend)
}

async fn me(CurrentSession(session): CurrentSession) -> Json<MeView> {
    Json(MeView::from(&session))
}
