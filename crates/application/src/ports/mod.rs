//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure and integration crates
//! implement these ports.

mod transit_provider;

#[cfg(test)]
pub use transit_provider::MockTransitDataProvider;
pub use transit_provider::{
    ArrivalsResult, DeparturesResult, FetchSource, Fetched, JourneysResult, TransitDataProvider,
};
