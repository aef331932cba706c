//! Response envelope
//!
//! Per-response behavior shared by every transit route: cache directives,
//! `Server-Timing`, `X-Cache`, pagination `Link` relations and pretty-print
//! negotiation. An [`Envelope`] is created when a request starts and turned
//! into the response once the handler has its result.

mod cache_control;
mod link_header;
mod render;
mod server_timing;

use std::time::{Duration, Instant};

use application::ports::FetchSource;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::Response;
use serde::Serialize;

pub use cache_control::{SURROGATE_CONTROL, allow_caching_for, forbid_caching};
pub use link_header::{Link, LinkHeader};
pub use render::to_json_bytes;
pub use server_timing::ServerTiming;

use crate::pagination::PageLinks;

pub const SERVER_TIMING: HeaderName = HeaderName::from_static("server-timing");
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Accumulates response metadata for one request
#[derive(Debug, Clone)]
pub struct Envelope {
    timing: ServerTiming,
    cache_seconds: Option<u64>,
    links: LinkHeader,
    source: Option<FetchSource>,
    pretty: bool,
}

impl Envelope {
    /// Start an envelope for a request that began at `started`
    #[must_use]
    pub const fn new(started: Instant) -> Self {
        Self {
            timing: ServerTiming::starting_at(started),
            cache_seconds: None,
            links: LinkHeader::new(),
            source: None,
            pretty: true,
        }
    }

    /// Let clients and CDNs cache the response
    pub const fn allow_caching_for(&mut self, seconds: u64) {
        self.cache_seconds = Some(seconds);
    }

    /// Record a provider round trip and where its result came from
    pub fn record_fetch(&mut self, source: FetchSource, duration: Duration) {
        let name = match source {
            FetchSource::Upstream => "provider",
            FetchSource::Cache => "cache",
        };
        self.timing.record(name, duration);
        self.source = Some(source);
    }

    /// Add `prev` / `next` relations
    pub fn set_page_links(&mut self, links: &PageLinks) {
        if let Some(prev) = &links.prev {
            self.links.set(Link::new("prev", prev.clone()));
        }
        if let Some(next) = &links.next {
            self.links.set(Link::new("next", next.clone()));
        }
    }

    pub const fn set_pretty(&mut self, pretty: bool) {
        self.pretty = pretty;
    }

    fn apply_headers(&self, headers: &mut HeaderMap) {
        if let Some(seconds) = self.cache_seconds {
            allow_caching_for(headers, seconds);
        }
        if let Some(source) = self.source {
            let hit = if source == FetchSource::Cache { "HIT" } else { "MISS" };
            headers.insert(X_CACHE, HeaderValue::from_static(hit));
        }
        if !self.links.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&self.links.to_string()) {
                headers.insert(header::LINK, value);
            }
        }
        // last, so `total` covers everything before the flush
        if let Ok(value) = HeaderValue::from_str(&self.timing.header_value()) {
            headers.insert(SERVER_TIMING, value);
        }
    }

    /// Finish with a JSON body
    pub fn json<T: Serialize + ?Sized>(
        self,
        status: StatusCode,
        body: &T,
    ) -> serde_json::Result<Response> {
        let bytes = to_json_bytes(body, self.pretty)?;
        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        self.apply_headers(headers);
        Ok(response)
    }

    /// Finish with a temporary redirect to `location`
    #[must_use]
    pub fn redirect(self, location: &str) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(location) {
            headers.insert(header::LOCATION, value);
        }
        self.apply_headers(headers);
        response
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_json_response() {
        let envelope = Envelope::new(Instant::now());
        let response = envelope.json(StatusCode::OK, &json!({"a": 1})).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert!(headers[SERVER_TIMING].to_str().unwrap().starts_with("total;dur="));
        assert!(headers.get(header::CACHE_CONTROL).is_none());
        assert!(headers.get(X_CACHE).is_none());
        assert!(headers.get(header::LINK).is_none());
    }

    #[test]
    fn cached_fetch_with_links() {
        let mut envelope = Envelope::new(Instant::now());
        envelope.allow_caching_for(60);
        envelope.record_fetch(FetchSource::Cache, Duration::from_millis(2));
        envelope.set_page_links(&PageLinks {
            prev: Some("/journeys?earlierThan=a".into()),
            next: Some("/journeys?laterThan=b".into()),
        });
        let response = envelope.json(StatusCode::OK, &json!([])).unwrap();
        let headers = response.headers();
        assert_eq!(headers[X_CACHE], "HIT");
        assert!(headers[SERVER_TIMING].to_str().unwrap().starts_with("cache;dur=2.0, total;dur="));
        assert_eq!(headers[SURROGATE_CONTROL], "stale-while-revalidate=60");
        let links = LinkHeader::parse(headers[header::LINK].to_str().unwrap());
        assert_eq!(links.get("prev").unwrap().uri, "/journeys?earlierThan=a");
        assert_eq!(links.get("next").unwrap().uri, "/journeys?laterThan=b");
    }

    #[test]
    fn upstream_fetch_is_a_miss() {
        let mut envelope = Envelope::new(Instant::now());
        envelope.record_fetch(FetchSource::Upstream, Duration::from_millis(1));
        let response = envelope.json(StatusCode::OK, &json!({})).unwrap();
        assert_eq!(response.headers()[X_CACHE], "MISS");
    }

    #[test]
    fn redirect_sets_location() {
        let response = Envelope::new(Instant::now()).redirect("/trips?when=1770805800");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/trips?when=1770805800");
    }
}
