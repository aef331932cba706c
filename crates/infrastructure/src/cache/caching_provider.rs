//! Caching decorator for transit data providers
//!
//! Wraps any [`TransitDataProvider`] and keeps successful results in a Moka
//! in-memory cache with a fixed TTL. Cached answers are tagged with
//! [`FetchSource::Cache`] so the HTTP layer can report hits.
//!
//! [`FetchSource::Cache`]: application::ports::FetchSource::Cache

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use application::ProviderError;
use application::ports::{
    ArrivalsResult, DeparturesResult, Fetched, JourneysResult, TransitDataProvider,
};
use async_trait::async_trait;
use domain::value_objects::{BoundingBox, Location, ProviderProfile, QueryOptions, StopId};
use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::cache_key;

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Results served from the cache
    pub hits: u64,
    /// Results fetched from the wrapped provider
    pub misses: u64,
    /// Entries currently held
    pub entries: u64,
}

/// Provider decorator that caches successful results
pub struct CachingProvider<P> {
    inner: P,
    cache: Cache<String, Arc<Value>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<P> std::fmt::Debug for CachingProvider<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingProvider")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<P: TransitDataProvider> CachingProvider<P> {
    /// Wrap `inner`, keeping up to `max_entries` results for `ttl`
    #[must_use]
    pub fn new(inner: P, ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self {
            inner,
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Current counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    async fn cached<T, F, Fut>(&self, key: String, fetch: F) -> Result<Fetched<T>, ProviderError>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Fetched<T>, ProviderError>> + Send,
    {
        if let Some(value) = self.cache.get(&key).await {
            match T::deserialize(value.as_ref()) {
                Ok(data) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(%key, "Cache hit");
                    return Ok(Fetched::cached(data));
                },
                Err(e) => {
                    warn!(%key, error = %e, "Discarding undecodable cache entry");
                    self.cache.invalidate(&key).await;
                },
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(%key, "Cache miss");
        let fetched = fetch().await?;
        match serde_json::to_value(&fetched.data) {
            Ok(value) => self.cache.insert(key, Arc::new(value)).await,
            Err(e) => warn!(%key, error = %e, "Result not cacheable"),
        }
        Ok(fetched)
    }
}

#[async_trait]
impl<P: TransitDataProvider> TransitDataProvider for CachingProvider<P> {
    fn profile(&self) -> &ProviderProfile {
        self.inner.profile()
    }

    async fn stop(&self, id: &StopId, opts: &QueryOptions) -> Result<Fetched<Value>, ProviderError> {
        let key = cache_key("stop", &[id.as_str()], &opts.to_query_pairs());
        self.cached(key, || self.inner.stop(id, opts)).await
    }

    async fn departures(
        &self,
        id: &StopId,
        opts: &QueryOptions,
    ) -> Result<Fetched<DeparturesResult>, ProviderError> {
        let key = cache_key("departures", &[id.as_str()], &opts.to_query_pairs());
        self.cached(key, || self.inner.departures(id, opts)).await
    }

    async fn arrivals(
        &self,
        id: &StopId,
        opts: &QueryOptions,
    ) -> Result<Fetched<ArrivalsResult>, ProviderError> {
        let key = cache_key("arrivals", &[id.as_str()], &opts.to_query_pairs());
        self.cached(key, || self.inner.arrivals(id, opts)).await
    }

    async fn journeys(
        &self,
        from: &Location,
        to: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<JourneysResult>, ProviderError> {
        let mut pairs = from.to_query_pairs("from");
        pairs.extend(to.to_query_pairs("to"));
        pairs.extend(opts.to_query_pairs());
        let key = cache_key("journeys", &[], &pairs);
        self.cached(key, || self.inner.journeys(from, to, opts)).await
    }

    async fn nearby(
        &self,
        location: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let mut pairs = location.to_query_pairs("location");
        pairs.extend(opts.to_query_pairs());
        let key = cache_key("nearby", &[], &pairs);
        self.cached(key, || self.inner.nearby(location, opts)).await
    }

    async fn locations(
        &self,
        query: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let key = cache_key("locations", &[query], &opts.to_query_pairs());
        self.cached(key, || self.inner.locations(query, opts)).await
    }

    async fn refresh_journey(
        &self,
        refresh_token: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let key = cache_key("refresh_journey", &[refresh_token], &opts.to_query_pairs());
        self.cached(key, || self.inner.refresh_journey(refresh_token, opts))
            .await
    }

    async fn trip(
        &self,
        id: &str,
        line_name: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let key = cache_key("trip", &[id, line_name], &opts.to_query_pairs());
        self.cached(key, || self.inner.trip(id, line_name, opts)).await
    }

    async fn trips_by_name(
        &self,
        query: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let key = cache_key("trips_by_name", &[query], &opts.to_query_pairs());
        self.cached(key, || self.inner.trips_by_name(query, opts)).await
    }

    // live vehicle positions are never cached
    async fn radar(
        &self,
        bbox: &BoundingBox,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        self.inner.radar(bbox, opts).await
    }

    async fn reachable_from(
        &self,
        address: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        let mut pairs = address.to_query_pairs("address");
        pairs.extend(opts.to_query_pairs());
        let key = cache_key("reachable_from", &[], &pairs);
        self.cached(key, || self.inner.reachable_from(address, opts))
            .await
    }

    async fn is_healthy(&self) -> bool {
        self.inner.is_healthy().await
    }
}
