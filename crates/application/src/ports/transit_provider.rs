//! Transit data provider port
//!
//! The HTTP engine only ever talks to transit data through this trait. Result
//! payloads are provider-defined JSON and are passed through uninterpreted,
//! except for the few fields pagination needs (cursor tokens and item
//! timestamps).

use async_trait::async_trait;
use domain::value_objects::{BoundingBox, Location, ProviderProfile, QueryOptions, StopId};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

/// Where a provider result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchSource {
    /// Fetched from the upstream data source
    #[default]
    Upstream,
    /// Served from a local cache
    Cache,
}

/// A provider result tagged with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    /// The result payload
    pub data: T,
    /// Whether the payload was cached
    pub source: FetchSource,
}

impl<T> Fetched<T> {
    /// Wrap a freshly fetched result
    pub const fn fresh(data: T) -> Self {
        Self {
            data,
            source: FetchSource::Upstream,
        }
    }

    /// Wrap a cached result
    pub const fn cached(data: T) -> Self {
        Self {
            data,
            source: FetchSource::Cache,
        }
    }

    /// Whether this result was served from a cache
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.source == FetchSource::Cache
    }

    /// Transform the payload, keeping the provenance
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            source: self.source,
        }
    }
}

impl<T> From<T> for Fetched<T> {
    fn from(data: T) -> Self {
        Self::fresh(data)
    }
}

/// Result of a journey search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneysResult {
    /// Found journeys, provider-defined shape
    pub journeys: Vec<Value>,
    /// Opaque cursor for the previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earlier_ref: Option<String>,
    /// Opaque cursor for the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub later_ref: Option<String>,
    /// When the realtime data was last updated (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime_data_updated_at: Option<i64>,
}

/// Result of a departures query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeparturesResult {
    /// Departures, provider-defined shape
    pub departures: Vec<Value>,
    /// When the realtime data was last updated (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime_data_updated_at: Option<i64>,
}

/// Result of an arrivals query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsResult {
    /// Arrivals, provider-defined shape
    pub arrivals: Vec<Value>,
    /// When the realtime data was last updated (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime_data_updated_at: Option<i64>,
}

/// Asynchronous access to transit data
///
/// Optional operations default to [`ProviderError::Unsupported`]; routes for
/// them are only registered when the profile's capabilities advertise them.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransitDataProvider: Send + Sync {
    /// Static capability descriptor
    fn profile(&self) -> &ProviderProfile;

    /// Look up a single stop or station
    async fn stop(&self, id: &StopId, opts: &QueryOptions) -> Result<Fetched<Value>, ProviderError>;

    /// Departures at a stop
    async fn departures(
        &self,
        id: &StopId,
        opts: &QueryOptions,
    ) -> Result<Fetched<DeparturesResult>, ProviderError>;

    /// Arrivals at a stop
    async fn arrivals(
        &self,
        id: &StopId,
        opts: &QueryOptions,
    ) -> Result<Fetched<ArrivalsResult>, ProviderError>;

    /// Journeys between two locations
    async fn journeys(
        &self,
        from: &Location,
        to: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<JourneysResult>, ProviderError>;

    /// Stops, POIs and addresses near a coordinate
    async fn nearby(
        &self,
        location: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError>;

    /// Free-text location search
    async fn locations(
        &self,
        query: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError>;

    /// Fetch the current state of a journey by its refresh token
    async fn refresh_journey(
        &self,
        _refresh_token: &str,
        _opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        Err(ProviderError::Unsupported("refresh_journey"))
    }

    /// Look up a single trip
    async fn trip(
        &self,
        _id: &str,
        _line_name: &str,
        _opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        Err(ProviderError::Unsupported("trip"))
    }

    /// Search trips by line name or number
    async fn trips_by_name(
        &self,
        _query: &str,
        _opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        Err(ProviderError::Unsupported("trips_by_name"))
    }

    /// Vehicle positions within an area
    async fn radar(
        &self,
        _bbox: &BoundingBox,
        _opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        Err(ProviderError::Unsupported("radar"))
    }

    /// Stops reachable from an address, grouped by duration
    async fn reachable_from(
        &self,
        _address: &Location,
        _opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        Err(ProviderError::Unsupported("reachable_from"))
    }

    /// Whether the provider can currently answer requests
    async fn is_healthy(&self) -> bool {
        true
    }
}
