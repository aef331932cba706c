//! Declarative parameter contracts
//!
//! Every route declares its path and query parameters as a
//! [`ParameterRegistry`]. The same registry drives request parsing
//! ([`parse_query`]), the OpenAPI parameter documentation and the URI
//! templates of the discovery document.

mod error;
mod location;
mod parsers;
mod query;
mod spec;

pub use error::{RegistryError, ValidationError};
pub use location::resolve_location;
pub use parsers::{Parser, SchemaKind};
pub use query::{QueryContractResult, RawQuery, parse_query, parse_query_at};
pub use spec::{Fallback, ParameterRegistry, ParameterSpec};
