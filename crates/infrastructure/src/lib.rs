//! Infrastructure layer - Adapters for external systems
//!
//! Implements the transit data provider port on top of the upstream HTTP
//! client, adds a caching decorator, and owns configuration loading and
//! logging setup.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod telemetry;

pub use adapters::TransitAdapter;
pub use cache::CachingProvider;
pub use config::{ApiConfig, AppConfig, CacheConfig, ConfigError, ServerConfig, TransitAppConfig};
pub use telemetry::{TelemetryError, init_logging};
