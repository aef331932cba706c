//! Public API identity and documentation settings.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Settings describing the API to clients
///
/// `name` and `hostname` have no defaults: a deployment must say who it is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// API name, used in `X-Powered-By` and the OpenAPI document
    pub name: String,

    /// Public hostname the API is served under
    pub hostname: String,

    /// Short description for the OpenAPI document
    #[serde(default)]
    pub description: Option<String>,

    /// Project homepage
    #[serde(default)]
    pub homepage: Option<String>,

    /// API version, sent as `X-API-Version`
    #[serde(default)]
    pub version: Option<String>,

    /// Link to human-readable documentation
    #[serde(default)]
    pub docs_link: Option<String>,

    /// Enable permissive CORS
    #[serde(default = "default_true")]
    pub cors: bool,

    /// Advertise the OpenAPI document via a `service-desc` Link on every response
    #[serde(default = "default_true")]
    pub expose_service_desc: bool,
}

impl ApiConfig {
    /// Create a minimal API configuration
    #[must_use]
    pub fn new(name: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            description: None,
            homepage: None,
            version: None,
            docs_link: None,
            cors: true,
            expose_service_desc: true,
        }
    }

    /// `X-Powered-By` value: name, version and homepage where known
    #[must_use]
    pub fn powered_by(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(version) = &self.version {
            parts.push(version);
        }
        if let Some(homepage) = &self.homepage {
            parts.push(homepage);
        }
        parts.join(" ")
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("api.name must not be empty".to_string());
        }
        if self.hostname.trim().is_empty() {
            return Err("api.hostname must not be empty".to_string());
        }
        for (key, value) in [
            ("api.description", &self.description),
            ("api.homepage", &self.homepage),
            ("api.version", &self.version),
            ("api.docs_link", &self.docs_link),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{key} must not be empty when set"));
            }
        }
        if let Some(homepage) = &self.homepage {
            url::Url::parse(homepage).map_err(|e| format!("api.homepage is not a valid URL: {e}"))?;
        }
        Ok(())
    }
}
