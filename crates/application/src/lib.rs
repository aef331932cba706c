//! Application layer - Ports and request-time helpers
//!
//! Defines the transit data provider capability the HTTP engine consumes,
//! the error taxonomy providers report with, and natural-language date
//! parsing used by date/time parameters.

pub mod date_parser;
pub mod error;
pub mod ports;

pub use date_parser::parse_when;
pub use error::ProviderError;
pub use ports::*;
