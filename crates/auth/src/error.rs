use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Auth errors for the hedwige_auth crate.
///
/// Wraps the core `AuthError` and adds the variants that only exist at
/// startup or at the request boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (state, token, storage, ...).
    #[error(transparent)]
    Core(#[from] hedwige_core::auth::AuthError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// No valid session was presented with the request.
    #[error("not authenticated")]
    Unauthenticated,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use hedwige_core::auth::AuthError as CoreError;

        let (status, message) = match &self {
            AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::Core(core_err) => match core_err {
                CoreError::InvalidState => (StatusCode::BAD_REQUEST, self.to_string()),
                CoreError::SessionNotFound | CoreError::SessionExpired => {
                    (StatusCode::UNAUTHORIZED, "not authenticated".to_string())
                }
                CoreError::InvalidToken(_) | CoreError::MissingClaim(_) => {
                    (StatusCode::UNAUTHORIZED, self.to_string())
                }
                CoreError::Storage(_) => {
                    tracing::error!(error = %self, "session store unavailable");
                    (StatusCode::UNAUTHORIZED, "not authenticated".to_string())
                }
                CoreError::CodeExchange(_) | CoreError::Provider(_) => {
                    tracing::error!(error = %self, "auth provider error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            AuthError::Config(_) => {
                tracing::error!(error = %self, "auth configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                )
            }
            AuthError::ProviderNotConfigured(provider) => (
                StatusCode::NOT_FOUND,
                format!("Authentication provider '{provider}' is not configured"),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
