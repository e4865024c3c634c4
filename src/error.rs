/// Error taxonomy surfaced by every client component.
use thiserror::Error;

/// Result type alias using `ClientError`
pub type Result<T> = std::result::Result<T, ClientError>;

/// Typed failure returned by the session, store, search and linker components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Missing, invalid or expired token, or rejected credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Malformed request reported by the backend
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist or no longer belongs to the user
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Transport failure, timeout or malformed response
    #[error("network error: {0}")]
    Network(String),
}

impl ClientError {
    pub fn auth_required() -> Self {
        ClientError::Auth("not authenticated".into())
    }

    pub fn playlist_not_found(id: impl Into<String>) -> Self {
        ClientError::NotFound {
            entity: "playlist".into(),
            id: id.into(),
        }
    }

    /// True when the caller should prompt for re-authentication.
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Network(format!("request timed out: {}", e))
        } else if e.is_decode() {
            ClientError::Network(format!("malformed response: {}", e))
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Network(format!("malformed response: {}", e))
    }
}
