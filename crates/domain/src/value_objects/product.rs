//! Transport-mode product descriptors

use serde::{Deserialize, Serialize};

/// A transport mode the provider lets clients filter by (e.g. `suburban`, `bus`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Query parameter name, e.g. `nationalExpress`
    pub id: String,
    /// Human-readable name, e.g. `InterCityExpress`
    pub name: String,
    /// Short label, e.g. `ICE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Whether the mode is included when the client does not say otherwise
    #[serde(default = "default_true")]
    pub default: bool,
}

const fn default_true() -> bool {
    true
}

impl Product {
    /// Create a product that is included by default
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            short: None,
            default: true,
        }
    }

    /// Set the short label
    #[must_use]
    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    /// Set whether the product is included by default
    #[must_use]
    pub const fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Label used in parameter descriptions: `name (short)` or just `name`
    #[must_use]
    pub fn label(&self) -> String {
        match &self.short {
            Some(short) if short != &self.name => format!("{} ({short})", self.name),
            _ => self.name.clone(),
        }
    }
}
