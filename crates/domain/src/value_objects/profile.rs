//! Provider capability descriptor
//!
//! Consulted once when the route table is assembled: it decides which
//! optional routes exist, which product filters are offered and in which
//! time zone local times are interpreted.

use chrono_tz::Tz;

use super::product::Product;
use super::stop_id::StopId;

/// Optional operations a provider may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Single trip lookup by id
    pub trip: bool,
    /// Trip search by line name
    pub trips_by_name: bool,
    /// Vehicle positions within a bounding box
    pub radar: bool,
    /// Reachability from an address
    pub reachable_from: bool,
    /// Refreshing a journey by its token
    pub refresh_journey: bool,
    /// Whether departures/arrivals can include related stations
    pub departures_related_stations: bool,
    /// Whether departures/arrivals can include stopovers
    pub departures_stopovers: bool,
}

impl Capabilities {
    /// Every optional operation enabled
    #[must_use]
    pub const fn all() -> Self {
        Self {
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

/// Static description of a transit data provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProfile {
    /// Zone used to interpret local times
    pub timezone: Tz,
    /// Selectable transport modes, in documentation order
    pub products: Vec<Product>,
    /// Optional operations
    pub capabilities: Capabilities,
    /// Minimum digits a stop id must have
    pub stop_id_min_length: usize,
    /// Language used when the client does not ask for one
    pub default_language: String,
}

impl Default for ProviderProfile {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            products: Vec::new(),
            capabilities: Capabilities::default(),
            stop_id_min_length: StopId::DEFAULT_MIN_LENGTH,
            default_language: "en".to_string(),
        }
    }
}

impl ProviderProfile {
    /// Set the time zone
    #[must_use]
    pub const fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the product list
    #[must_use]
    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    /// Set the capabilities
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the minimum stop id length
    #[must_use]
    pub const fn with_stop_id_min_length(mut self, min_length: usize) -> Self {
        self.stop_id_min_length = min_length;
        self
    }

    /// Look up a product by its parameter name
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_minimal() {
        let profile = ProviderProfile::default();
        assert_eq!(profile.timezone, Tz::UTC);
        assert!(profile.products.is_empty());
        assert!(!profile.capabilities.trip);
        assert_eq!(profile.stop_id_min_length, 1);
        assert_eq!(profile.default_language, "en");
    }

    #[test]
    fn builder_sets_fields() {
        let profile = ProviderProfile::default()
            .with_timezone(chrono_tz::Europe::Berlin)
            .with_products(vec![Product::new("bus", "Bus")])
            .with_capabilities(Capabilities::all())
            .with_stop_id_min_length(5);
        assert_eq!(profile.timezone, chrono_tz::Europe::Berlin);
        assert!(profile.capabilities.radar);
        assert_eq!(profile.stop_id_min_length, 5);
        assert!(profile.product("bus").is_some());
        assert!(profile.product("tram").is_none());
    }
}
