//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Stop identifier does not match the provider's id format
    #[error("Invalid stop id: {value:?} (expected at least {min_length} digits)")]
    InvalidStopId {
        /// The rejected input
        value: String,
        /// Minimum number of digits the provider expects
        min_length: usize,
    },
}

impl DomainError {
    /// Create an invalid stop id error
    pub fn invalid_stop_id(value: impl Into<String>, min_length: usize) -> Self {
        Self::InvalidStopId {
            value: value.into(),
            min_length,
        }
    }
}
