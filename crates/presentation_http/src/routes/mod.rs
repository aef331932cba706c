//! Route definitions
//!
//! The transit routes come from the assembled [`RouteTable`]; each is
//! mounted with its descriptor as a request extension so one pair of
//! handlers serves them all.

mod catalogue;
pub mod params;
mod table;

use std::sync::Arc;

use axum::{Extension, Router, response::Html, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa_redoc::{Redoc, Servable};

pub use catalogue::assemble;
pub use table::{CachePolicy, Endpoint, RouteDescriptor, RouteDoc, RouteError, RouteTable};

use crate::handlers::{docs, health, transit};
use crate::middleware::{ApiHeadersLayer, RequestIdLayer};
use crate::openapi::SERVICE_DESC_PATH;
use crate::state::AppState;

/// Create the main router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new();
    for route in state.routes.iter() {
        let descriptor = Arc::new(route.clone());
        let handler = if route.path_params.is_empty() {
            get(transit::route_handler)
        } else {
            get(transit::route_with_path_handler)
        };
        router = router.route(&route.path, handler.layer(Extension(descriptor)));
    }

    let redoc_html = Redoc::with_url("/redoc", state.openapi.as_ref().clone()).to_html();

    let router = router
        .route("/", get(docs::index))
        .route("/health", get(health::health_check))
        .route(SERVICE_DESC_PATH, get(docs::service_desc))
        .route("/openapi.json", get(docs::service_desc))
        .route("/swagger.json", get(docs::service_desc))
        .route(
            "/redoc",
            get(move || {
                let html = redoc_html.clone();
                async move { Html(html) }
            }),
        );

    // Add middleware (order matters: last added = outermost)
    let router = router
        .layer(ApiHeadersLayer::new(&state.api))
        .layer(TraceLayer::new_for_http())
        .layer(RequestIdLayer::new());

    let router = if state.api.cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
