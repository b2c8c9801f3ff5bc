use thiserror::Error;

/// Errors returned by resource API clients (Gmail, Calendar).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// The provider rejected the access token (expired or revoked).
    #[error("access token rejected: {0}")]
    Unauthorized(String),

    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("invalid upstream response: {0}")]
    Decode(String),
}

/// Result type for resource API operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

impl ResourceError {
    /// Classify an unsuccessful HTTP status from a resource API.
    pub fn from_status(status: u16, message: String, resource: &'static str, id: &str) -> Self {
        match status {
            401 => ResourceError::Unauthorized(message),
            404 => ResourceError::NotFound {
                resource,
                id: id.to_string(),
            },
            _ => ResourceError::Status { status, message },
        }
    }
}
