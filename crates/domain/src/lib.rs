//! Domain layer for the transit REST API
//!
//! Contains the value objects every other layer speaks in: stop identifiers,
//! locations, typed parameter values, the per-request option map and the
//! provider's capability profile. This layer knows nothing about HTTP.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
