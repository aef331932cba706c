//! HTTP middleware components
//!
//! Request correlation and the headers every API response carries.

pub mod api_headers;
pub mod request_id;

pub use api_headers::{ApiHeaders, ApiHeadersLayer};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
