//! Transit route handlers
//!
//! Every transit route goes through [`dispatch`]: the path and query are
//! parsed against the route's registries, the provider is called once, and
//! the result is wrapped in the response envelope.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use application::ProviderError;
use application::ports::{FetchSource, Fetched};
use axum::{
    Extension,
    extract::{Path, RawQuery as QueryString, State},
    http::{StatusCode, Uri},
    response::Response,
};
use chrono::Utc;
use domain::value_objects::{
    BoundingBox, Coordinate, Location, ParamValue, QueryOptions, StopId,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::contract::{RawQuery, ValidationError, parse_query_at};
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::pagination::{PageLinks, cursor_links, window_links, with_params};
use crate::routes::{Endpoint, RouteDescriptor, params::PRETTY};
use crate::state::AppState;

/// Step `trips` redirects round the current time to
const WHEN_SNAP_SECS: i64 = 10;

/// Handler for routes without path parameters
pub async fn route_handler(
    State(state): State<AppState>,
    Extension(route): Extension<Arc<RouteDescriptor>>,
    uri: Uri,
    QueryString(query): QueryString,
) -> Result<Response, ApiError> {
    dispatch(&state, &route, Vec::new(), uri.path(), query.as_deref()).await
}

/// Handler for routes with `{name}` path segments
pub async fn route_with_path_handler(
    State(state): State<AppState>,
    Extension(route): Extension<Arc<RouteDescriptor>>,
    Path(segments): Path<Vec<(String, String)>>,
    uri: Uri,
    QueryString(query): QueryString,
) -> Result<Response, ApiError> {
    dispatch(&state, &route, segments, uri.path(), query.as_deref()).await
}

/// Per-request context shared by the endpoint functions
struct Call<'a> {
    state: &'a AppState,
    path: &'a str,
    query: &'a RawQuery,
    /// Parsed path parameters
    params: QueryOptions,
    /// Names of query parameters the client actually sent
    supplied: BTreeSet<String>,
}

/// A provider result with its provenance and round-trip time
struct Timed<T> {
    data: T,
    source: FetchSource,
    elapsed: Duration,
}

async fn timed<T>(
    call: impl Future<Output = Result<Fetched<T>, ProviderError>>,
) -> Result<Timed<T>, ProviderError> {
    let started = Instant::now();
    let fetched = call.await?;
    Ok(Timed {
        data: fetched.data,
        source: fetched.source,
        elapsed: started.elapsed(),
    })
}

enum Reply {
    Json {
        body: Value,
        source: FetchSource,
        elapsed: Duration,
        links: PageLinks,
    },
    Redirect(String),
}

impl Reply {
    fn json<T: Serialize>(result: Timed<T>, links: PageLinks) -> Result<Self, ApiError> {
        let body =
            serde_json::to_value(&result.data).map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(Self::Json {
            body,
            source: result.source,
            elapsed: result.elapsed,
            links,
        })
    }
}

/// Run one transit request through the contract engine
#[instrument(skip_all, fields(route = %route.name))]
pub async fn dispatch(
    state: &AppState,
    route: &RouteDescriptor,
    segments: Vec<(String, String)>,
    path: &str,
    query: Option<&str>,
) -> Result<Response, ApiError> {
    let mut envelope = Envelope::new(Instant::now());
    let now = Utc::now();
    let query = RawQuery::parse(query);

    let path_result = parse_query_at(&route.path_params, &RawQuery::from_pairs(segments), now);
    let query_result = parse_query_at(&route.query_params, &query, now);
    let mut errors = path_result.errors;
    errors.extend(query_result.errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let mut options = query_result.options;
    if let Some(pretty) = options.remove(PRETTY).and_then(|v| v.as_bool()) {
        envelope.set_pretty(pretty);
    }
    debug!(?options, "Parsed request");

    let call = Call {
        state,
        path,
        query: &query,
        params: path_result.options,
        supplied: query_result.supplied,
    };

    let reply = match route.endpoint {
        Endpoint::Stop => stop(&call, options).await?,
        Endpoint::Departures => departures(&call, options).await?,
        Endpoint::Arrivals => arrivals(&call, options).await?,
        Endpoint::Journeys => journeys(&call, options).await?,
        Endpoint::RefreshJourney => refresh_journey(&call, options).await?,
        Endpoint::Trip => trip(&call, options).await?,
        Endpoint::Trips => trips(&call, options).await?,
        Endpoint::Nearby => nearby(&call, options).await?,
        Endpoint::Locations => locations(&call, options).await?,
        Endpoint::ReachableFrom => reachable_from(&call, options).await?,
        Endpoint::Radar => radar(&call, options).await?,
    };

    match reply {
        Reply::Json {
            body,
            source,
            elapsed,
            links,
        } => {
            if let Some(ttl) = route.cache.ttl_secs {
                envelope.allow_caching_for(ttl);
            }
            envelope.record_fetch(source, elapsed);
            envelope.set_page_links(&links);
            envelope
                .json(StatusCode::OK, &body)
                .map_err(|e| ApiError::Internal(e.to_string()))
        },
        Reply::Redirect(location) => Ok(envelope.redirect(&location)),
    }
}

impl Call<'_> {
    fn stop_id(&self) -> Result<StopId, ApiError> {
        let raw = self
            .params
            .get_str("id")
            .ok_or_else(|| ApiError::Validation(vec![ValidationError::missing("id")]))?;
        StopId::parse(raw, self.state.provider.profile().stop_id_min_length)
            .map_err(|e| ApiError::invalid("id", e.to_string()))
    }

    fn path_string(&self, name: &str) -> Result<String, ApiError> {
        self.params
            .get_str(name)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation(vec![ValidationError::missing(name)]))
    }

    /// Reject requests that supply both of any of the given pairs
    fn exclusive(&self, pairs: &[(&str, &str)]) -> Result<(), ApiError> {
        let errors: Vec<ValidationError> = pairs
            .iter()
            .filter(|(a, b)| self.supplied.contains(*a) && self.supplied.contains(*b))
            .map(|(a, b)| ValidationError::new(*b, format!("is mutually exclusive with {a}")))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }

    fn supplied_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.supplied.contains(*n))
    }
}

fn take_string(options: &mut QueryOptions, name: &str) -> Result<String, ApiError> {
    match options.remove(name) {
        Some(ParamValue::String(s)) => Ok(s),
        _ => Err(ApiError::Validation(vec![ValidationError::missing(name)])),
    }
}

fn take_number(options: &mut QueryOptions, name: &str) -> Result<f64, ApiError> {
    options
        .remove(name)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ApiError::Validation(vec![ValidationError::missing(name)]))
}

fn take_location(options: &mut QueryOptions, name: &str) -> Result<Location, ApiError> {
    match options.remove(name) {
        Some(ParamValue::Location(location)) => Ok(location),
        _ => Err(ApiError::Validation(vec![ValidationError::missing(name)])),
    }
}

async fn stop(call: &Call<'_>, options: QueryOptions) -> Result<Reply, ApiError> {
    let id = call.stop_id()?;
    let result = timed(call.state.provider.stop(&id, &options)).await?;
    Reply::json(result, PageLinks::default())
}

async fn departures(call: &Call<'_>, options: QueryOptions) -> Result<Reply, ApiError> {
    let id = call.stop_id()?;
    let result = timed(call.state.provider.departures(&id, &options)).await?;
    let links = window_links(
        call.path,
        call.query,
        options.get_datetime("when"),
        options.get_i64("duration"),
        &result.data.departures,
        call.state.provider.profile().timezone,
    );
    Reply::json(result, links)
}

async fn arrivals(call: &Call<'_>, options: QueryOptions) -> Result<Reply, ApiError> {
    let id = call.stop_id()?;
    let result = timed(call.state.provider.arrivals(&id, &options)).await?;
    let links = window_links(
        call.path,
        call.query,
        options.get_datetime("when"),
        options.get_i64("duration"),
        &result.data.arrivals,
        call.state.provider.profile().timezone,
    );
    Reply::json(result, links)
}

async fn journeys(call: &Call<'_>, mut options: QueryOptions) -> Result<Reply, ApiError> {
    call.exclusive(&[
        ("departure", "arrival"),
        ("earlierThan", "laterThan"),
        ("departure", "earlierThan"),
        ("departure", "laterThan"),
        ("arrival", "earlierThan"),
        ("arrival", "laterThan"),
    ])?;
    let from = take_location(&mut options, "from")?;
    let to = take_location(&mut options, "to")?;

    let result = timed(call.state.provider.journeys(&from, &to, &options)).await?;
    let links = cursor_links(
        call.path,
        call.query,
        result.data.earlier_ref.as_deref(),
        result.data.later_ref.as_deref(),
    );
    Reply::json(result, links)
}

async fn refresh_journey(call: &Call<'_>, options: QueryOptions) -> Result<Reply, ApiError> {
    let token = call.path_string("ref")?;
    let result = timed(call.state.provider.refresh_journey(&token, &options)).await?;
    Reply::json(result, PageLinks::default())
}

async fn trip(call: &Call<'_>, mut options: QueryOptions) -> Result<Reply, ApiError> {
    let id = call.path_string("id")?;
    let line_name = take_string(&mut options, "lineName")?;
    let result = timed(call.state.provider.trip(&id, &line_name, &options)).await?;
    Reply::json(result, PageLinks::default())
}

async fn trips(call: &Call<'_>, mut options: QueryOptions) -> Result<Reply, ApiError> {
    call.exclusive(&[("when", "fromWhen"), ("when", "untilWhen")])?;
    if !call.supplied_any(&["when", "fromWhen", "untilWhen"]) {
        let now = Utc::now().timestamp();
        let snapped = (now - now.rem_euclid(WHEN_SNAP_SECS)).to_string();
        let location = with_params(call.path, call.query, &[("when", Some(&snapped))]);
        return Ok(Reply::Redirect(location));
    }

    let query = take_string(&mut options, "query")?;
    let result = timed(call.state.provider.trips_by_name(&query, &options)).await?;
    Reply::json(result, PageLinks::default())
}

async fn nearby(call: &Call<'_>, mut options: QueryOptions) -> Result<Reply, ApiError> {
    let latitude = take_number(&mut options, "latitude")?;
    let longitude = take_number(&mut options, "longitude")?;
    let location = Location::Coordinate(Coordinate::new(latitude, longitude));

    let result = timed(call.state.provider.nearby(&location, &options)).await?;
    Reply::json(result, PageLinks::default())
}

async fn locations(call: &Call<'_>, mut options: QueryOptions) -> Result<Reply, ApiError> {
    let query = take_string(&mut options, "query")?;
    let result = timed(call.state.provider.locations(&query, &options)).await?;
    Reply::json(result, PageLinks::default())
}

async fn reachable_from(call: &Call<'_>, mut options: QueryOptions) -> Result<Reply, ApiError> {
    let latitude = take_number(&mut options, "latitude")?;
    let longitude = take_number(&mut options, "longitude")?;
    let address = take_string(&mut options, "address")?;
    let location =
        Location::Coordinate(Coordinate::new(latitude, longitude).with_address(address));

    let result = timed(call.state.provider.reachable_from(&location, &options)).await?;
    Reply::json(result, PageLinks::default())
}

async fn radar(call: &Call<'_>, mut options: QueryOptions) -> Result<Reply, ApiError> {
    let bbox = BoundingBox {
        north: take_number(&mut options, "north")?,
        west: take_number(&mut options, "west")?,
        south: take_number(&mut options, "south")?,
        east: take_number(&mut options, "east")?,
    };
    let result = timed(call.state.provider.radar(&bbox, &options)).await?;
    Reply::json(result, PageLinks::default())
}
