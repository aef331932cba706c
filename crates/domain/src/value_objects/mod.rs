//! Value Objects - Immutable, identity-less domain primitives

mod location;
mod param_value;
mod product;
mod profile;
mod query_options;
mod stop_id;

pub use location::{BoundingBox, Coordinate, Location, Place};
pub use param_value::ParamValue;
pub use product::Product;
pub use profile::{Capabilities, ProviderProfile};
pub use query_options::QueryOptions;
pub use stop_id::StopId;
