//! Upstream transit provider configuration.

use chrono_tz::Tz;
use domain::value_objects::{Capabilities, Product, ProviderProfile};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Upstream transit provider configuration
///
/// Besides where to reach the upstream API this describes the provider's
/// profile: its time zone, product filters and optional operations.
#[allow(clippy::struct_excessive_bools)] // Configuration needs multiple boolean flags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitAppConfig {
    /// Base URL of the upstream REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// IANA time zone local times are interpreted in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Minimum digits a stop id must have
    #[serde(default = "default_stop_id_min_length")]
    pub stop_id_min_length: usize,

    /// Language used when the client does not ask for one
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Selectable transport modes
    #[serde(default = "default_products")]
    pub products: Vec<Product>,

    /// Provider supports single trip lookup
    #[serde(default = "default_true")]
    pub trip: bool,

    /// Provider supports trip search by name
    #[serde(default = "default_true")]
    pub trips_by_name: bool,

    /// Provider supports radar
    #[serde(default = "default_true")]
    pub radar: bool,

    /// Provider supports reachability queries
    #[serde(default = "default_true")]
    pub reachable_from: bool,

    /// Provider supports journey refresh
    #[serde(default = "default_true")]
    pub refresh_journey: bool,

    /// Departures/arrivals can include related stations
    #[serde(default = "default_true")]
    pub departures_related_stations: bool,

    /// Departures/arrivals can include stopovers
    #[serde(default = "default_true")]
    pub departures_stopovers: bool,
}

fn default_base_url() -> String {
    "https://v6.db.transport.rest".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("transit-rest/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

const fn default_stop_id_min_length() -> usize {
    5
}

fn default_language() -> String {
    "en".to_string()
}

fn default_products() -> Vec<Product> {
    vec![
        Product::new("nationalExpress", "InterCityExpress").with_short("ICE"),
        Product::new("national", "InterCity & EuroCity").with_short("IC/EC"),
        Product::new("regionalExpress", "RegionalExpress & InterRegio").with_short("RE/IR"),
        Product::new("regional", "Regio").with_short("RB"),
        Product::new("suburban", "S-Bahn").with_short("S"),
        Product::new("bus", "Bus").with_short("B"),
        Product::new("ferry", "Ferry").with_short("F"),
        Product::new("subway", "U-Bahn").with_short("U"),
        Product::new("tram", "Tram").with_short("T"),
        Product::new("taxi", "Group Taxi").with_short("Taxi"),
    ]
}

impl Default for TransitAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            timezone: default_timezone(),
            stop_id_min_length: default_stop_id_min_length(),
            default_language: default_language(),
            products: default_products(),
            trip: true,
            trips_by_name: true,
            radar: true,
            reachable_from: true,
            refresh_journey: true,
            departures_related_stations: true,
            departures_stopovers: true,
        }
    }
}

impl TransitAppConfig {
    /// Convert to `integration_transit::TransitConfig`
    #[must_use]
    pub fn to_transit_config(&self) -> integration_transit::TransitConfig {
        integration_transit::TransitConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }

    /// Parse the configured time zone
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA zone.
    pub fn tz(&self) -> Result<Tz, String> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| format!("transit.timezone {:?} is not a known IANA time zone", self.timezone))
    }

    /// Build the provider profile described by this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the time zone is invalid.
    pub fn profile(&self) -> Result<ProviderProfile, String> {
        let capabilities = Capabilities {
            trip: self.trip,
            trips_by_name: self.trips_by_name,
            radar: self.radar,
            reachable_from: self.reachable_from,
            refresh_journey: self.refresh_journey,
            departures_related_stations: self.departures_related_stations,
            departures_stopovers: self.departures_stopovers,
        };
        Ok(ProviderProfile {
            timezone: self.tz()?,
            products: self.products.clone(),
            capabilities,
            stop_id_min_length: self.stop_id_min_length,
            default_language: self.default_language.clone(),
        })
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        self.to_transit_config()
            .validate()
            .map_err(|e| format!("transit.{e}"))?;
        self.tz()?;

        if self.stop_id_min_length == 0 {
            return Err("transit.stop_id_min_length must be greater than 0".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for product in &self.products {
            if product.id.trim().is_empty() {
                return Err("transit.products entries need a non-empty id".to_string());
            }
            if !seen.insert(product.id.as_str()) {
                return Err(format!("transit.products lists {:?} twice", product.id));
            }
        }
        Ok(())
    }
}
