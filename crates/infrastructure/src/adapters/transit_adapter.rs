//! Transit adapter - Implements TransitDataProvider using integration_transit

use application::ports::{
    ArrivalsResult, DeparturesResult, Fetched, JourneysResult, TransitDataProvider,
};
use application::ProviderError;
use async_trait::async_trait;
use domain::value_objects::{BoundingBox, Location, ProviderProfile, QueryOptions, StopId};
use integration_transit::{HafasTransitClient, TransitClient, TransitError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{instrument, warn};

/// Provider backed by an upstream transport.rest / HAFAS REST API
///
/// Typed options are forwarded as query parameters; locations are expanded
/// back into their `prefix`, `prefix.latitude`, ... form.
pub struct TransitAdapter<C = HafasTransitClient> {
    client: C,
    profile: ProviderProfile,
}

impl<C> std::fmt::Debug for TransitAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitAdapter")
            .field("timezone", &self.profile.timezone)
            .field("products", &self.profile.products.len())
            .finish_non_exhaustive()
    }
}

impl<C: TransitClient> TransitAdapter<C> {
    /// Create a new transit adapter
    pub const fn new(client: C, profile: ProviderProfile) -> Self {
        Self { client, profile }
    }

    async fn fetch(
        &self,
        segments: &[&str],
        query: Vec<(String, String)>,
    ) -> Result<Value, ProviderError> {
        self.client
            .get_json(segments, &query)
            .await
            .map_err(to_provider_error)
    }

    async fn fetch_as<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: Vec<(String, String)>,
    ) -> Result<T, ProviderError> {
        let body = self.fetch(segments, query).await?;
        serde_json::from_value(body).map_err(|e| {
            warn!(error = %e, "Unexpected upstream response shape");
            ProviderError::upstream_with_details("Unexpected upstream response", e.to_string())
        })
    }
}

/// Reclassify client failures into the provider taxonomy
fn to_provider_error(err: TransitError) -> ProviderError {
    match err {
        TransitError::BadRequest { message } => ProviderError::InvalidRequest(message),
        TransitError::NotFound { message } => ProviderError::NotFound(message),
        TransitError::Timeout { .. } => ProviderError::Timeout,
        TransitError::RequestFailed {
            status,
            message,
            body,
        } => ProviderError::upstream_with_details(format!("HTTP {status}: {message}"), body),
        TransitError::RateLimitExceeded { .. } => ProviderError::upstream("Upstream rate limit exceeded"),
        TransitError::ConnectionFailed(e) => {
            ProviderError::upstream_with_details("Upstream unreachable", e)
        },
        TransitError::ParseError(e) => {
            ProviderError::upstream_with_details("Invalid upstream response", e)
        },
        TransitError::ConfigurationError(e) => ProviderError::Internal(e),
    }
}

/// Plain `latitude`/`longitude` (plus `address`) pairs for a coordinate location
fn coordinate_pairs(location: &Location) -> Result<Vec<(String, String)>, ProviderError> {
    let coordinate = location
        .as_coordinate()
        .ok_or_else(|| ProviderError::InvalidRequest("a coordinate is required".to_string()))?;
    let mut pairs = vec![
        ("latitude".to_string(), coordinate.latitude.to_string()),
        ("longitude".to_string(), coordinate.longitude.to_string()),
    ];
    if let Some(address) = coordinate.address() {
        pairs.push(("address".to_string(), address.to_string()));
    }
    Ok(pairs)
}

/// Upstream answers departures/arrivals either as `{departures: [...]}` or as a bare list
fn list_or_object<T: DeserializeOwned>(
    body: Value,
    key: &str,
) -> Result<T, ProviderError> {
    let body = match body {
        Value::Array(items) => {
            let mut wrapped = serde_json::Map::new();
            wrapped.insert(key.to_string(), Value::Array(items));
            Value::Object(wrapped)
        },
        other => other,
    };
    serde_json::from_value(body).map_err(|e| {
        ProviderError::upstream_with_details("Unexpected upstream response", e.to_string())
    })
}

#[async_trait]
impl<C: TransitClient> TransitDataProvider for TransitAdapter<C> {
    fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    #[instrument(skip(self, opts))]
    async fn stop(&self, id: &StopId, opts: &QueryOptions) -> Result<Fetched<Value>, ProviderError> {
        let body = self
            .fetch(&["stops", id.as_str()], opts.to_query_pairs())
            .await?;
        Ok(Fetched::fresh(body))
    }

    #[instrument(skip(self, opts))]
    async fn departures(
        &self,
        id: &StopId,
        opts: &QueryOptions,
    ) -> Result<Fetched<DeparturesResult>, ProviderError> {
        let body = self
            .fetch(&["stops", id.as_str(), "departures"], opts.to_query_pairs())
            .await?;
        list_or_object(body, "departures").map(Fetched::fresh)
    }

    #[instrument(skip(self, opts))]
    async fn arrivals(
        &self,
        id: &StopId,
        opts: &QueryOptions,
    ) -> Result<Fetched<ArrivalsResult>, ProviderError> {
        let body = self
            .fetch(&["stops", id.as_str(), "arrivals"], opts.to_query_pairs())
            .await?;
        list_or_object(body, "arrivals").map(Fetched::fresh)
    }

    #[instrument(skip(self, opts))]
    async fn journeys(
        &self,
        from: &Location,
        to: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<JourneysResult>, ProviderError> {
        let mut query = from.to_query_pairs("from");
        query.extend(to.to_query_pairs("to"));
        query.extend(opts.to_query_pairs());
        self.fetch_as(&["journeys"], query).await.map(Fetched::fresh)
    }

    #[instrument(skip(self, opts))]
    async fn nearby(
        &self,
        location: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let mut query = coordinate_pairs(location)?;
        query.extend(opts.to_query_pairs());
        self.fetch(&["locations", "nearby"], query)
            .await
            .map(Fetched::fresh)
    }

    #[instrument(skip(self, opts))]
    async fn locations(
        &self,
        query: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let mut pairs = vec![("query".to_string(), query.to_string())];
        pairs.extend(opts.to_query_pairs());
        self.fetch(&["locations"], pairs).await.map(Fetched::fresh)
    }

    #[instrument(skip(self, opts))]
    async fn refresh_journey(
        &self,
        refresh_token: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        self.fetch(&["journeys", refresh_token], opts.to_query_pairs())
            .await
            .map(Fetched::fresh)
    }

    #[instrument(skip(self, opts))]
    async fn trip(
        &self,
        id: &str,
        line_name: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let mut query = vec![("lineName".to_string(), line_name.to_string())];
        query.extend(opts.to_query_pairs());
        self.fetch(&["trips", id], query).await.map(Fetched::fresh)
    }

    #[instrument(skip(self, opts))]
    async fn trips_by_name(
        &self,
        query: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let mut pairs = vec![("query".to_string(), query.to_string())];
        pairs.extend(opts.to_query_pairs());
        self.fetch(&["trips"], pairs).await.map(Fetched::fresh)
    }

    #[instrument(skip(self, opts))]
    async fn radar(
        &self,
        bbox: &BoundingBox,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let mut query = bbox.to_query_pairs();
        query.extend(opts.to_query_pairs());
        self.fetch(&["radar"], query).await.map(Fetched::fresh)
    }

    #[instrument(skip(self, opts))]
    async fn reachable_from(
        &self,
        address: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let mut query = coordinate_pairs(address)?;
        query.extend(opts.to_query_pairs());
        self.fetch(&["stops", "reachable-from"], query)
            .await
            .map(Fetched::fresh)
    }

    async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }
}
