//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: listener and logging settings
//! - `api`: public API identity and documentation settings
//! - `transit`: upstream provider and its profile
//! - `cache`: provider response cache
//!
//! Sources are layered: built-in defaults, then an optional TOML file
//! (`config.toml`, or the path in `TRANSIT_REST_CONFIG`), then environment
//! variables such as `TRANSIT_REST__SERVER__PORT=8080`. Unknown keys and
//! missing required keys are rejected when loading, never at first use.

mod api;
mod cache;
mod server;
mod transit;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use api::ApiConfig;
pub use cache::CacheConfig;
pub use server::ServerConfig;
pub use transit::TransitAppConfig;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "TRANSIT_REST_CONFIG";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "TRANSIT_REST";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The configuration was read but is not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Public API identity
    pub api: ApiConfig,

    /// Upstream transit provider
    #[serde(default)]
    pub transit: TransitAppConfig,

    /// Provider response cache
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Create a configuration with defaults for everything but the API identity
    #[must_use]
    pub fn new(api: ApiConfig) -> Self {
        Self {
            server: ServerConfig::default(),
            api,
            transit: TransitAppConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed, a required key is
    /// missing, an unknown key is present or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        let file = match path.as_deref() {
            Some(path) => {
                debug!(path, "Loading configuration file");
                config::File::with_name(path).required(true)
            },
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., TRANSIT_REST__SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    /// Parse configuration from a TOML string, without consulting the environment
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::load`].
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending key.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.api.validate()?;
        self.transit.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}
