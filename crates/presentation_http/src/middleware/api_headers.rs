//! Static API response headers
//!
//! Adds to every response:
//! - `X-Content-Type-Options: nosniff`
//! - `Content-Security-Policy: default-src 'none'`
//! - `X-Powered-By` and, when configured, `X-API-Version`
//! - a `service-desc` relation in the `Link` header, merged with whatever
//!   relations the handler set
//! - a `Server-Timing` `total` entry if the handler did not emit one

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, header},
    response::Response,
};
use infrastructure::ApiConfig;
use tower::{Layer, Service};

use crate::envelope::{Link, LinkHeader, SERVER_TIMING, ServerTiming};
use crate::openapi::{OPENAPI_CONTENT_TYPE, SERVICE_DESC_PATH};

const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");
const X_API_VERSION: HeaderName = HeaderName::from_static("x-api-version");

#[derive(Debug)]
struct StaticHeaders {
    powered_by: Option<HeaderValue>,
    api_version: Option<HeaderValue>,
    service_desc: Option<Link>,
}

impl StaticHeaders {
    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'"),
        );
        if let Some(value) = &self.powered_by {
            headers.insert(X_POWERED_BY, value.clone());
        }
        if let Some(value) = &self.api_version {
            headers.insert(X_API_VERSION, value.clone());
        }
        if let Some(link) = &self.service_desc {
            merge_link(headers, link.clone());
        }
    }
}

/// Add `link` to the `Link` header, keeping relations already present
fn merge_link(headers: &mut HeaderMap, link: Link) {
    let existing = headers
        .get_all(header::LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(", ");
    let mut links = LinkHeader::parse(&existing);
    links.set(link);
    if let Ok(value) = HeaderValue::from_str(&links.to_string()) {
        headers.insert(header::LINK, value);
    }
}

/// Layer that adds the static API headers to all responses
#[derive(Clone, Debug)]
pub struct ApiHeadersLayer {
    headers: Arc<StaticHeaders>,
}

impl ApiHeadersLayer {
    /// Create the layer from the API identity
    #[must_use]
    pub fn new(api: &ApiConfig) -> Self {
        let service_desc = api.expose_service_desc.then(|| {
            Link::new("service-desc", SERVICE_DESC_PATH).with_param("type", OPENAPI_CONTENT_TYPE)
        });
        Self {
            headers: Arc::new(StaticHeaders {
                powered_by: HeaderValue::from_str(&api.powered_by()).ok(),
                api_version: api
                    .version
                    .as_deref()
                    .and_then(|v| HeaderValue::from_str(v).ok()),
                service_desc,
            }),
        }
    }
}

impl<S> Layer<S> for ApiHeadersLayer {
    type Service = ApiHeaders<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiHeaders {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Middleware service that adds the static API headers
#[derive(Clone, Debug)]
pub struct ApiHeaders<S> {
    inner: S,
    headers: Arc<StaticHeaders>,
}

impl<S> Service<Request> for ApiHeaders<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let started = Instant::now();
        let mut inner = self.inner.clone();
        let static_headers = Arc::clone(&self.headers);

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            let headers = response.headers_mut();
            static_headers.apply(headers);

            if !headers.contains_key(SERVER_TIMING) {
                let timing = ServerTiming::starting_at(started).header_value();
                if let Ok(value) = HeaderValue::from_str(&timing) {
                    headers.insert(SERVER_TIMING, value);
                }
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn plain() -> &'static str {
        "ok"
    }

    async fn paginated() -> Response {
        let mut response = Response::new(Body::from("[]"));
        response.headers_mut().insert(
            header::LINK,
            HeaderValue::from_static("</journeys?laterThan=x>; rel=\"next\""),
        );
        response
    }

    fn api() -> ApiConfig {
        let mut api = ApiConfig::new("db-rest", "localhost");
        api.version = Some("6.0.0".to_string());
        api
    }

    async fn call(api: &ApiConfig, path: &str) -> Response {
        let app = Router::new()
            .route("/", get(plain))
            .route("/journeys", get(paginated))
            .layer(ApiHeadersLayer::new(api));
        app.oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn adds_static_headers() {
        let response = call(&api(), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["content-security-policy"], "default-src 'none'");
        assert_eq!(headers["x-powered-by"], "db-rest 6.0.0");
        assert_eq!(headers["x-api-version"], "6.0.0");
        assert!(headers[SERVER_TIMING].to_str().unwrap().starts_with("total;dur="));
    }

    #[tokio::test]
    async fn service_desc_is_merged_with_pagination() {
        let response = call(&api(), "/journeys").await;
        let links = LinkHeader::parse(response.headers()[header::LINK].to_str().unwrap());
        assert_eq!(links.get("next").unwrap().uri, "/journeys?laterThan=x");
        let desc = links.get("service-desc").unwrap();
        assert_eq!(desc.uri, SERVICE_DESC_PATH);
        assert_eq!(
            desc.params,
            vec![("type".to_string(), OPENAPI_CONTENT_TYPE.to_string())]
        );
    }

    #[tokio::test]
    async fn service_desc_can_be_disabled() {
        let mut api = api();
        api.expose_service_desc = false;
        api.version = None;
        let response = call(&api, "/").await;
        assert!(response.headers().get(header::LINK).is_none());
        assert!(response.headers().get("x-api-version").is_none());
    }
}
