//! Transit REST HTTP presentation layer
//!
//! The declarative route/parameter contract engine and the axum server
//! built on it: parameter registries and parsers ([`contract`]), pagination
//! links ([`pagination`]), the response envelope ([`envelope`]), OpenAPI
//! projection ([`openapi`]) and the route table ([`routes`]).

pub mod contract;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod pagination;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{RouteError, RouteTable, assemble, create_router};
pub use state::AppState;
