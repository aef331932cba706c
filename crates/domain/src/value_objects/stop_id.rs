//! Stop identifier value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A provider-specific stop identifier (all digits, e.g. an IBNR)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    /// Minimum length used when the provider does not specify one
    pub const DEFAULT_MIN_LENGTH: usize = 1;

    /// Parse a stop id, requiring at least `min_length` ASCII digits and nothing else
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStopId` if the value is too short or
    /// contains a non-digit character.
    pub fn parse(raw: &str, min_length: usize) -> Result<Self, DomainError> {
        let min_length = min_length.max(1);
        if raw.len() >= min_length && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(DomainError::invalid_stop_id(raw, min_length))
        }
    }

    /// Get the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StopId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
