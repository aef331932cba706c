//! Contract errors

use serde::Serialize;
use thiserror::Error;

/// A single rejected parameter
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{parameter}: {message}")]
pub struct ValidationError {
    /// Name of the offending parameter
    pub parameter: String,
    /// Human-readable reason
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for `parameter`
    pub fn new(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// A required parameter was not supplied
    pub fn missing(parameter: impl Into<String>) -> Self {
        Self::new(parameter, "missing required parameter")
    }
}

/// Errors raised while composing parameter registries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two merged registries declare the same parameter
    #[error("Parameter {name:?} is declared twice")]
    Conflict {
        /// The duplicated name
        name: String,
    },
}
