//! Transit error types

use thiserror::Error;

/// Errors that can occur while talking to the upstream API
#[derive(Debug, Error)]
pub enum TransitError {
    /// Connection to the upstream failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Upstream rejected the request (HTTP 400)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Upstream's error message
        message: String,
    },

    /// Upstream has no such entity (HTTP 404)
    #[error("Not found: {message}")]
    NotFound {
        /// Upstream's error message
        message: String,
    },

    /// Any other non-2xx answer
    #[error("Request failed with HTTP {status}: {message}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Upstream's error message
        message: String,
        /// Raw response body
        body: String,
    },

    /// Failed to parse the response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl TransitError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout { .. } | Self::RateLimitExceeded { .. }
        ) || matches!(self, Self::RequestFailed { status, .. } if *status >= 500)
    }
}
