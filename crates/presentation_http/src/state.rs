//! Application state shared across handlers

use std::fmt;
use std::sync::Arc;

use application::ports::TransitDataProvider;
use infrastructure::ApiConfig;
use utoipa::openapi::OpenApi;

use crate::openapi;
use crate::routes::{RouteError, RouteTable, assemble};

/// Shared application state
///
/// Everything here is built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Transit data source
    pub provider: Arc<dyn TransitDataProvider>,
    /// Routes derived from the provider profile
    pub routes: Arc<RouteTable>,
    /// Public API identity
    pub api: Arc<ApiConfig>,
    /// OpenAPI document projected from the route table
    pub openapi: Arc<OpenApi>,
}

impl AppState {
    /// Assemble the route table and documentation for `provider`
    ///
    /// # Errors
    ///
    /// Fails if the provider profile yields an inconsistent route table.
    pub fn new(provider: Arc<dyn TransitDataProvider>, api: ApiConfig) -> Result<Self, RouteError> {
        let routes = assemble(provider.profile())?;
        let document = openapi::build_document(&routes, &api);
        Ok(Self {
            provider,
            routes: Arc::new(routes),
            api: Arc::new(api),
            openapi: Arc::new(document),
        })
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("routes", &self.routes.len())
            .field("api", &self.api.name)
            .finish_non_exhaustive()
    }
}
