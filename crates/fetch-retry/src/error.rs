//! Error types for HTTP fetches
//!
//! [`FetchError`] is the failure payload of a single request attempt. It is what
//! a request function returns and what the retry predicate sees as a failed
//! outcome. Errors of a whole retry sequence are [`FetchRetryError`].

use crate::http::HttpResponse;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for single-attempt operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Terminal error of a `fetch_with_retry` call over the default HTTP types.
pub type FetchRetryError = fetch_retry_core::RetryError<HttpResponse, FetchError>;

/// Failure of a single request attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid HTTP header name or value.
    #[error("Invalid HTTP header: {0}")]
    InvalidHeader(String),

    /// Request timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FetchError {
    /// Whether the error is likely transient.
    ///
    /// The default retry predicate retries every failure; this is for custom
    /// predicates that want to be pickier.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Connection(_))
    }
}

#[cfg(feature = "reqwest")]
impl FetchError {
    /// Classify a `reqwest` error, keeping the configured timeout for reporting.
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout: Option<Duration>) -> Self {
        if error.is_timeout() {
            FetchError::Timeout(timeout.unwrap_or_default())
        } else if error.is_builder() {
            FetchError::HttpClient(error.to_string())
        } else if error.is_body() || error.is_decode() {
            FetchError::Body(error.to_string())
        } else {
            FetchError::Connection(error.to_string())
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::from_reqwest(error, None)
    }
}
