//! Error types for the Logtail clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors returned by the log-cache and cloud controller clients
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body was not the expected JSON
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The requested application does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// The resource is missing, either by lookup or by a 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::ApiError { status: 404, .. })
    }

    /// The credentials were missing or rejected (401 or 403)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::ApiError { status: 401 | 403, .. })
    }

    /// The service failed on its side (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
