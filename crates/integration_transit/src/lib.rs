//! Upstream transit data over HTTP
//!
//! Talks to a [transport.rest](https://v6.db.transport.rest)-style REST API
//! (HAFAS-based). The client is deliberately thin: it builds URLs from path
//! segments and query pairs, maps HTTP failures onto [`TransitError`] and
//! hands back the JSON body untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_transit::{HafasTransitClient, TransitClient, TransitConfig};
//!
//! let client = HafasTransitClient::new(&TransitConfig::default())?;
//! let stop = client
//!     .get_json(&["stops", "8011306"], &[("language".into(), "en".into())])
//!     .await?;
//! ```

mod client;
mod config;
mod error;

pub use client::{HafasTransitClient, TransitClient};
pub use config::TransitConfig;
pub use error::TransitError;
