//! Provider error taxonomy

use domain::DomainError;
use thiserror::Error;

/// Errors a transit data provider can fail with
///
/// Upstream details are kept for server-side diagnostics only; the HTTP layer
/// never forwards them to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider rejected the request as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unclassified upstream failure
    #[error("Upstream error: {message}")]
    Upstream {
        /// Human-readable summary
        message: String,
        /// Raw upstream payload or transport error, never sent to clients
        details: Option<String>,
    },

    /// The upstream did not answer in time
    #[error("Upstream request timed out")]
    Timeout,

    /// The provider does not implement this operation
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// Anything unanticipated
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Create an upstream error without details
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            details: None,
        }
    }

    /// Create an upstream error carrying diagnostic details
    pub fn upstream_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Whether the failure originates from the remote side
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Timeout)
    }

    /// Stable snake_case identifier for error bodies
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::NotFound(_) => "not_found",
            Self::Upstream { .. } => "upstream_error",
            Self::Timeout => "upstream_timeout",
            Self::Unsupported(_) => "unsupported",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<DomainError> for ProviderError {
    fn from(err: DomainError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}
