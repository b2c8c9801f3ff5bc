use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use hedwige_auth::AuthError;
use hedwige_core::upstream::ResourceError;

/// Failures of the authenticated proxy routes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    NotFound(String),

    /// Gmail or Calendar failed, including a rejected access token.
    #[error("upstream failure: {0}")]
    Upstream(#[source] ResourceError),
}

impl From<ResourceError> for ApiError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Upstream(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if !matches!(err, AuthError::Unauthenticated) {
            tracing::error!(error = %err, "authentication failed");
        }
        ApiError::Unauthenticated
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Upstream(source) => {
                tracing::error!(error = %source, "upstream call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream service error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
