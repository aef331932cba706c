//! Documentation surfaces: discovery document and OpenAPI JSON

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::envelope::to_json_bytes;
use crate::error::ApiError;
use crate::openapi::OPENAPI_CONTENT_TYPE;
use crate::state::AppState;

/// Whether an `Accept` header admits a JSON response
///
/// A missing header admits anything.
pub fn accepts_json(headers: &HeaderMap) -> bool {
    let values: Vec<&str> = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    if values.is_empty() {
        return true;
    }
    values
        .iter()
        .flat_map(|v| v.split(','))
        .filter_map(|range| {
            let mut parts = range.split(';');
            let media = parts.next()?.trim().to_ascii_lowercase();
            let rejected = parts.any(|p| {
                p.trim()
                    .strip_prefix("q=")
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .is_some_and(|q| q <= 0.0)
            });
            (!rejected).then_some(media)
        })
        .any(|media| {
            matches!(
                media.as_str(),
                "application/json" | "application/*" | "*/*"
            ) || media.ends_with("+json")
        })
}

fn pretty_requested(query: Option<&str>) -> bool {
    !url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .any(|(k, v)| k == "pretty" && v.eq_ignore_ascii_case("false"))
}

fn json_response<T: Serialize + ?Sized>(
    body: &T,
    pretty: bool,
    content_type: &'static str,
) -> Result<Response, ApiError> {
    let bytes = to_json_bytes(body, pretty).map_err(|e| ApiError::Internal(e.to_string()))?;
    let mut response = (StatusCode::OK, bytes).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    Ok(response)
}

/// `GET /`: route name to URI template map for JSON clients
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    if !accepts_json(&headers) {
        return Err(ApiError::NotFound);
    }
    json_response(
        &state.routes.discovery(),
        pretty_requested(query.as_deref()),
        "application/json; charset=utf-8",
    )
}

/// The OpenAPI document
pub async fn service_desc(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    json_response(
        state.openapi.as_ref(),
        pretty_requested(query.as_deref()),
        OPENAPI_CONTENT_TYPE,
    )
}
