//! Error types for talking to the chat backend.

use thiserror::Error;

/// Backend error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure or an undecodable response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no error message"))]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the response body, when there was one.
        message: Option<String>,
    },
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, ApiError>;
