//! API error handling
//!
//! Provides typed errors for backend operations with descriptive messages
//! and a recovered-vs-surfaced classification for the UI.

use thiserror::Error;

use crate::models::QuoteId;

/// Errors that can occur while talking to the quotes backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request never produced a response (connection refused, timeout, ...)
    #[error("Request to '{url}' failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status
    #[error("Server returned {status} for '{url}'")]
    Status { url: String, status: u16 },

    /// Response body was not the JSON we expected
    #[error("Malformed response from '{url}': {details}")]
    Decode { url: String, details: String },

    /// Quote is not in the local store
    #[error("Quote {0} not found")]
    UnknownQuote(QuoteId),

    /// Required input was missing
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Base URL could not be parsed
    #[error("Invalid base URL '{url}': {details}")]
    InvalidUrl { url: String, details: String },
}

impl ApiError {
    /// Create an error from a reqwest error with URL context
    ///
    /// Classifies the error based on what failed (body decoding vs transport).
    pub fn from_reqwest(error: reqwest::Error, url: impl Into<String>) -> Self {
        let url = url.into();
        if error.is_decode() {
            ApiError::Decode {
                url,
                details: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            ApiError::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            ApiError::Network { url, source: error }
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors are transient; repeating the action may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ApiError::Network { .. } => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            _ => false,
        }
    }

    /// Short message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network { .. } => {
                "Could not reach the quotes server. Check that it is running and try again."
                    .to_string()
            }
            ApiError::Status { status: 404, .. } => {
                "The quote no longer exists on the server. Reload with r.".to_string()
            }
            ApiError::Status { status, .. } if *status >= 500 => {
                format!("The quotes server failed ({}). Try again.", status)
            }
            ApiError::Status { status, .. } => format!("Request rejected by server ({}).", status),
            ApiError::Decode { .. } => "The server sent a response that could not be read.".to_string(),
            ApiError::UnknownQuote(id) => format!("Quote {} is not loaded.", id),
            ApiError::InvalidInput(msg) => msg.clone(),
            ApiError::InvalidUrl { url, .. } => format!("Invalid server URL: {}", url),
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
