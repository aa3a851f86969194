//! Error handling for restcrud

use crate::http::response::RestResponse;
use thiserror::Error;

/// Main error type for restcrud operations
#[derive(Error, Debug)]
pub enum RestError {
    /// The transport failed before a response was obtained.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with anything other than `200 OK`.
    #[error("Unexpected status: {}", .0.status())]
    Status(RestResponse),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl RestError {
    /// The response carried by a non-200 status error.
    pub fn response(&self) -> Option<&RestResponse> {
        match self {
            RestError::Status(response) => Some(response),
            _ => None,
        }
    }
}

/// Result type alias for restcrud operations
pub type Result<T> = std::result::Result<T, RestError>;
