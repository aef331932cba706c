//! Integration tests for the transit routes
//!
//! A recording provider stands in for the upstream, so these tests cover the
//! whole request path: parameter contracts, provider calls and the response
//! envelope.

#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};

use application::ProviderError;
use application::ports::{
    ArrivalsResult, DeparturesResult, Fetched, JourneysResult, TransitDataProvider,
};
use async_trait::async_trait;
use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use domain::value_objects::{
    BoundingBox, Capabilities, Coordinate, Location, ProviderProfile, QueryOptions, StopId,
};
use infrastructure::ApiConfig;
use presentation_http::{AppState, create_router};
use serde_json::{Value, json};

/// A provider call as the engine made it
#[derive(Debug, Clone)]
enum Recorded {
    Stop(StopId, QueryOptions),
    Departures(StopId, QueryOptions),
    Journeys(Location, Location, QueryOptions),
    Nearby(Location, QueryOptions),
    Locations(String, QueryOptions),
    Trips(String, QueryOptions),
    Radar(BoundingBox),
}

#[derive(Debug)]
struct RecordingProvider {
    profile: ProviderProfile,
    calls: Mutex<Vec<Recorded>>,
    healthy: bool,
    cached: bool,
}

impl RecordingProvider {
    fn new() -> Self {
        Self::with_capabilities(Capabilities::all())
    }

    fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            profile: ProviderProfile::default().with_capabilities(capabilities),
            calls: Mutex::new(Vec::new()),
            healthy: true,
            cached: false,
        }
    }

    fn record(&self, call: Recorded) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn fetched<T>(&self, data: T) -> Fetched<T> {
        if self.cached {
            Fetched::cached(data)
        } else {
            Fetched::fresh(data)
        }
    }
}

#[async_trait]
impl TransitDataProvider for RecordingProvider {
    fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    async fn stop(&self, id: &StopId, opts: &QueryOptions) -> Result<Fetched<Value>, ProviderError> {
        self.record(Recorded::Stop(id.clone(), opts.clone()));
        Ok(self.fetched(json!({"type": "stop", "id": id.as_str(), "name": "Berlin Hbf"})))
    }

    async fn departures(
        &self,
        id: &StopId,
        opts: &QueryOptions,
    ) -> Result<Fetched<DeparturesResult>, ProviderError> {
        self.record(Recorded::Departures(id.clone(), opts.clone()));
        Ok(self.fetched(DeparturesResult {
            departures: vec![
                json!({"tripId": "t1", "when": "2026-02-11T10:02:00+01:00"}),
                json!({"tripId": "t2", "when": "2026-02-11T10:07:00+01:00"}),
            ],
            realtime_data_updated_at: Some(1_770_800_000),
        }))
    }

    async fn arrivals(
        &self,
        _id: &StopId,
        _opts: &QueryOptions,
    ) -> Result<Fetched<ArrivalsResult>, ProviderError> {
        Ok(self.fetched(ArrivalsResult::default()))
    }

    async fn journeys(
        &self,
        from: &Location,
        to: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<JourneysResult>, ProviderError> {
        self.record(Recorded::Journeys(from.clone(), to.clone(), opts.clone()));
        Ok(self.fetched(JourneysResult {
            journeys: vec![json!({"legs": []})],
            earlier_ref: Some("earlier|token/1".to_string()),
            later_ref: Some("later-token-2".to_string()),
            realtime_data_updated_at: None,
        }))
    }

    async fn nearby(
        &self,
        location: &Location,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        self.record(Recorded::Nearby(location.clone(), opts.clone()));
        Ok(self.fetched(json!([])))
    }

    async fn locations(
        &self,
        query: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        self.record(Recorded::Locations(query.to_string(), opts.clone()));
        if query == "upstream-down" {
            return Err(ProviderError::upstream_with_details(
                "HAFAS error",
                "<html>stack trace</html>",
            ));
        }
        Ok(self.fetched(json!([{"type": "stop", "id": "8011160"}])))
    }

    async fn trips_by_name(
        &self,
        query: &str,
        opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        self.record(Recorded::Trips(query.to_string(), opts.clone()));
        Ok(self.fetched(json!({"trips": []})))
    }

    async fn radar(
        &self,
        bbox: &BoundingBox,
        _opts: &QueryOptions,
    ) -> Result<Fetched<Value>, ProviderError> {
        self.record(Recorded::Radar(*bbox));
        Ok(self.fetched(json!({"movements": []})))
    }

    async fn is_healthy(&self) -> bool {
        self.healthy
    }
}

fn api_config() -> ApiConfig {
    let mut api = ApiConfig::new("test-rest", "localhost");
    api.version = Some("1.2.3".to_string());
    api
}

fn server_for(provider: Arc<RecordingProvider>) -> TestServer {
    let state = AppState::new(provider, api_config()).expect("Failed to assemble routes");
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn create_test_server() -> (TestServer, Arc<RecordingProvider>) {
    let provider = Arc::new(RecordingProvider::new());
    (server_for(Arc::clone(&provider)), provider)
}

fn calls(provider: &RecordingProvider) -> Vec<Recorded> {
    provider.calls.lock().expect("calls lock").clone()
}

fn header_str<'a>(response: &'a axum_test::TestResponse, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

// ============================================================================
// Transit routes
// ============================================================================

#[tokio::test]
async fn test_stop_returns_provider_record() {
    let (server, provider) = create_test_server();

    let response = server.get("/stops/12345678").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({"type": "stop", "id": "12345678", "name": "Berlin Hbf"})
    );

    let calls = calls(&provider);
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Recorded::Stop(id, opts) => {
            assert_eq!(id.as_str(), "12345678");
            assert_eq!(opts.get_bool("linesOfStops"), Some(false));
            assert_eq!(opts.get_str("language"), Some("en"));
            assert!(!opts.contains("pretty"));
        },
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn test_stop_with_invalid_id_is_rejected() {
    let (server, provider) = create_test_server();

    let response = server.get("/stops/abc").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], true);
    assert_eq!(body["errors"][0]["parameter"], "id");
    assert!(calls(&provider).is_empty());
}

#[tokio::test]
async fn test_nearby_passes_coordinate() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/locations/nearby")
        .add_query_param("latitude", "123")
        .add_query_param("longitude", "321")
        .await;

    response.assert_status_ok();
    let cache_control = header_str(&response, "cache-control").expect("cache-control");
    assert!(cache_control.contains("max-age=300"));

    match &calls(&provider)[0] {
        Recorded::Nearby(location, opts) => {
            assert_eq!(location, &Location::Coordinate(Coordinate::new(123.0, 321.0)));
            assert_eq!(opts.get_i64("results"), Some(8));
            assert!(!opts.contains("latitude"));
        },
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn test_journeys_resolves_locations_and_links_pages() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/journeys?from=123&to.id=321&to.name=Foo&to.latitude=1.23&to.longitude=3.21&foo=bar")
        .await;

    response.assert_status_ok();
    match &calls(&provider)[0] {
        Recorded::Journeys(from, to, opts) => {
            assert_eq!(from.as_stop().map(StopId::as_str), Some("123"));
            assert_eq!(
                to,
                &Location::Coordinate(
                    Coordinate::new(1.23, 3.21).with_name("Foo").with_poi("321")
                )
            );
            assert!(!opts.contains("foo"));
            assert!(!opts.contains("from"));
            assert_eq!(opts.get_i64("results"), Some(3));
        },
        other => panic!("unexpected call: {other:?}"),
    }

    let link = header_str(&response, "link").expect("link header");
    assert!(link.contains("earlierThan=earlier%7Ctoken%2F1"));
    assert!(link.contains("laterThan=later-token-2"));
    assert!(link.contains("rel=\"prev\""));
    assert!(link.contains("rel=\"next\""));
    assert!(link.contains("foo=bar"));
    assert!(link.contains("to.id=321"));
    assert!(link.contains("rel=\"service-desc\""));
}

#[tokio::test]
async fn test_journeys_missing_origin_is_rejected() {
    let (server, provider) = create_test_server();

    let response = server.get("/journeys").add_query_param("to", "8011160").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_parameters");
    assert_eq!(body["errors"][0]["parameter"], "from");
    assert!(calls(&provider).is_empty());
}

#[tokio::test]
async fn test_journeys_conflicting_anchors_are_rejected() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/journeys?from=8011160&to=8000261&departure=2026-02-11T10:00:00%2B01:00&arrival=2026-02-11T12:00:00%2B01:00")
        .await;

    response.assert_status_bad_request();
    assert!(calls(&provider).is_empty());
}

#[tokio::test]
async fn test_departures_out_of_range_when_is_rejected() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/stops/8011160/departures")
        .add_query_param("when", "99999999 days from now")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["parameter"], "when");
    assert!(calls(&provider).is_empty());
}

#[tokio::test]
async fn test_departures_link_to_next_window() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/stops/8011160/departures")
        .add_query_param("when", "2026-02-11T10:00:00+01:00")
        .add_query_param("duration", "10")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["departures"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["realtimeDataUpdatedAt"], 1_770_800_000);

    let link = header_str(&response, "link").expect("link header");
    assert!(link.contains("rel=\"next\""));
    assert!(link.contains("when=2026-02-11T09%3A11%2B00%3A00"));
    assert!(link.contains("duration=10"));
    assert!(!link.contains("rel=\"prev\""));

    match &calls(&provider)[0] {
        Recorded::Departures(id, opts) => {
            assert_eq!(id.as_str(), "8011160");
            assert_eq!(opts.get_i64("duration"), Some(10));
            assert!(opts.get_datetime("when").is_some());
        },
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn test_trips_without_time_redirects() {
    let (server, provider) = create_test_server();

    let response = server.get("/trips").add_query_param("lineName", "S5").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    let location = header_str(&response, "location").expect("location header");
    assert!(location.starts_with("/trips?lineName=S5&when="));
    let when: i64 = location
        .rsplit("when=")
        .next()
        .and_then(|s| s.parse().ok())
        .expect("unix timestamp");
    assert_eq!(when % 10, 0);
    assert!(calls(&provider).is_empty());
}

#[tokio::test]
async fn test_trips_with_time_queries_provider() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/trips")
        .add_query_param("when", "1770800000")
        .add_query_param("operatorNames", "DB Regio,,S-Bahn Berlin")
        .await;

    response.assert_status_ok();
    match &calls(&provider)[0] {
        Recorded::Trips(query, opts) => {
            assert_eq!(query, "*");
            let operators = opts.get("operatorNames").and_then(|v| v.as_strings());
            assert_eq!(
                operators,
                Some(&["DB Regio".to_string(), "S-Bahn Berlin".to_string()][..])
            );
        },
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn test_radar_builds_bounding_box() {
    let (server, provider) = create_test_server();

    let response = server
        .get("/radar?north=52.52&west=13.36&south=52.50&east=13.40")
        .await;

    response.assert_status_ok();
    match &calls(&provider)[0] {
        Recorded::Radar(bbox) => {
            assert!((bbox.north - 52.52).abs() < f64::EPSILON);
            assert!((bbox.east - 13.40).abs() < f64::EPSILON);
        },
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn test_optional_routes_absent_without_capability() {
    let provider = Arc::new(RecordingProvider::with_capabilities(Capabilities::default()));
    let server = server_for(provider);

    server.get("/radar?north=1&west=1&south=1&east=1").await.assert_status_not_found();
    server.get("/trips/abc?lineName=S5").await.assert_status_not_found();
    server.get("/stops/8011160").await.assert_status_ok();
}

#[tokio::test]
async fn test_upstream_failure_hides_details() {
    let (server, _provider) = create_test_server();

    let response = server.get("/locations").add_query_param("query", "upstream-down").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["msg"], "HAFAS error");
    assert!(!response.text().contains("stack trace"));
    assert_eq!(header_str(&response, "cache-control"), Some("no-store"));
    assert!(header_str(&response, "server-timing").is_some());
}

// ============================================================================
// Response envelope
// ============================================================================

#[tokio::test]
async fn test_pretty_false_is_compact() {
    let (server, _provider) = create_test_server();

    let pretty = server.get("/locations").add_query_param("query", "Berlin").await;
    assert!(pretty.text().contains("\n\t"));

    let compact = server
        .get("/locations")
        .add_query_param("query", "Berlin")
        .add_query_param("pretty", "false")
        .await;
    compact.assert_status_ok();
    assert!(!compact.text().contains('\n'));
}

#[tokio::test]
async fn test_fresh_result_reports_miss() {
    let (server, _provider) = create_test_server();

    let response = server.get("/stops/8011160").await;

    assert_eq!(header_str(&response, "x-cache"), Some("MISS"));
    let timing = header_str(&response, "server-timing").expect("server-timing");
    assert!(timing.contains("provider;dur="));
    assert!(timing.contains("total;dur="));
}

#[tokio::test]
async fn test_cached_result_reports_hit() {
    let provider = Arc::new(RecordingProvider {
        cached: true,
        ..RecordingProvider::new()
    });
    let server = server_for(provider);

    let response = server.get("/stops/8011160").await;

    assert_eq!(header_str(&response, "x-cache"), Some("HIT"));
    let timing = header_str(&response, "server-timing").expect("server-timing");
    assert!(timing.contains("cache;dur="));
}

#[tokio::test]
async fn test_static_api_headers() {
    let (server, _provider) = create_test_server();

    let response = server.get("/health").await;

    assert_eq!(header_str(&response, "x-content-type-options"), Some("nosniff"));
    assert_eq!(header_str(&response, "x-powered-by"), Some("test-rest 1.2.3"));
    assert_eq!(header_str(&response, "x-api-version"), Some("1.2.3"));
    let link = header_str(&response, "link").expect("link header");
    assert!(link.contains("</.well-known/service-desc>; rel=\"service-desc\""));
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (server, _provider) = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            header::HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc-123"),
        )
        .await;

    assert_eq!(header_str(&response, "x-request-id"), Some("abc-123"));
}

// ============================================================================
// Health & documentation
// ============================================================================

#[tokio::test]
async fn test_health_ok() {
    let (server, _provider) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(header_str(&response, "cache-control"), Some("no-store"));
}

#[tokio::test]
async fn test_health_unhealthy_provider() {
    let provider = Arc::new(RecordingProvider {
        healthy: false,
        ..RecordingProvider::new()
    });
    let server = server_for(provider);

    let response = server.get("/health").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_discovery_document() {
    let (server, _provider) = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["stopUrl"],
        "/stops{/id}{?linesOfStops,language,pretty}"
    );
    assert!(body["journeysUrl"].as_str().is_some_and(|t| t.starts_with("/journeys{?from,")));
    assert!(body["radarUrl"].is_string());
}

#[tokio::test]
async fn test_discovery_requires_json_accept() {
    let (server, _provider) = create_test_server();

    let response = server
        .get("/")
        .add_header(header::ACCEPT, HeaderValue::from_static("text/html"))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_service_desc() {
    let (server, _provider) = create_test_server();

    let response = server.get("/.well-known/service-desc").await;

    response.assert_status_ok();
    assert_eq!(
        header_str(&response, "content-type"),
        Some("application/vnd.oai.openapi;version=3.1.0")
    );
    let body: Value = response.json();
    assert_eq!(body["info"]["title"], "test-rest");
    assert!(body["paths"]["/journeys"]["get"].is_object());
}

#[tokio::test]
async fn test_redoc_page() {
    let (server, _provider) = create_test_server();

    let response = server.get("/redoc").await;

    response.assert_status_ok();
    assert!(response.text().contains("redoc"));
}
