//! API error handling
//!
//! Maps validation and provider failures to HTTP statuses. Upstream details
//! are logged server-side and never reach the response body.

use application::ProviderError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::contract::ValidationError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more request parameters were rejected
    #[error("Invalid request: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The transit data provider failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiError {
    /// Shorthand for a single handler-level validation failure
    pub fn invalid(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![ValidationError::new(parameter, message)])
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Provider(e) => match e {
                ProviderError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                ProviderError::NotFound(_) => StatusCode::NOT_FOUND,
                ProviderError::Upstream { .. } | ProviderError::Timeout => StatusCode::BAD_GATEWAY,
                ProviderError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
                ProviderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable snake_case identifier for the body's `code` field
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_parameters",
            Self::Provider(e) => e.code(),
            Self::NotFound => "not_found",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Client-facing message, stripped of upstream details
    fn public_message(&self) -> String {
        match self {
            Self::Validation(errors) => join_errors(errors),
            Self::Provider(ProviderError::Upstream { message, .. }) => message.clone(),
            Self::Provider(ProviderError::Internal(_)) | Self::Internal(_) => {
                "An internal error occurred".to_string()
            },
            Self::Provider(e) => e.to_string(),
            Self::NotFound => "Not found".to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `true`
    pub error: bool,
    /// Human-readable message
    pub msg: String,
    /// Error code
    pub code: &'static str,
    /// Individual parameter problems
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Provider(ProviderError::Upstream {
                message,
                details: Some(details),
            }) => error!(%message, %details, "Provider request failed"),
            Self::Provider(e) if status.is_server_error() => error!(error = %e, "Provider request failed"),
            Self::Internal(msg) => error!(error = %msg, "Internal error"),
            other => warn!(error = %other, status = status.as_u16(), "Request rejected"),
        }

        let body = ErrorResponse {
            error: true,
            msg: self.public_message(),
            code: self.code(),
            errors: match self {
                Self::Validation(errors) => Some(errors),
                _ => None,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status.is_server_error() {
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        }
        response
    }
}
