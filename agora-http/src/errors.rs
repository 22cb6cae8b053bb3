//! HTTP error types

use serde_json::Value as JsonValue;

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("Backend responded with status {status}")]
    Status { status: u16, body: JsonValue },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No mock response available in offline mode for {0}")]
    NoMock(String),
}

impl HttpError {
    /// HTTP status of a backend rejection, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Body the backend sent along with a rejection
    pub fn body(&self) -> Option<&JsonValue> {
        match self {
            HttpError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::NetworkError(e) if e.is_timeout())
    }
}
