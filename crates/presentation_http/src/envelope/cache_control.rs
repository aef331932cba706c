//! Cache directives

use axum::http::{HeaderMap, HeaderValue, header};

/// `Surrogate-Control` is not a standard header constant
pub const SURROGATE_CONTROL: &str = "surrogate-control";

/// Allow clients and CDNs to cache a response for `seconds`
///
/// Clients may keep using a stale copy for another `seconds` if refetching
/// fails; CDNs may serve it while revalidating.
pub fn allow_caching_for(headers: &mut HeaderMap, seconds: u64) {
    if let Ok(value) = HeaderValue::from_str(&format!(
        "public, max-age={seconds}, s-maxage={seconds}, stale-if-error={seconds}"
    )) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("stale-while-revalidate={seconds}")) {
        headers.insert(SURROGATE_CONTROL, value);
    }
}

/// Forbid caching entirely
pub fn forbid_caching(headers: &mut HeaderMap) {
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
}
