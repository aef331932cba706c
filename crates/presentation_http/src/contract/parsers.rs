//! Typed parameter parsers
//!
//! Parsers are pure functions from a raw query-string value to a
//! [`ParamValue`]. They never panic: any input either parses or yields a
//! [`ValidationError`] naming the parameter.

use application::parse_when;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use domain::value_objects::{Location, ParamValue, StopId};

use super::ValidationError;

/// JSON schema type a parser produces, for documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    String,
    Integer,
    Number,
    Boolean,
    DateTime,
}

/// The fixed set of parameter parsers
#[derive(Debug, Clone, PartialEq)]
pub enum Parser {
    /// Trimmed text
    String,
    /// Whole number; fractional input is truncated
    Integer,
    /// Finite floating point number
    Number,
    /// Case-insensitive `true` / `false`
    Boolean,
    /// Unix seconds, ISO 8601 or a relative expression, local to the zone
    DateTime(Tz),
    /// One of a fixed set of values, matched exactly
    Enum(Vec<String>),
    /// Comma-separated list of trimmed, non-empty strings
    StringList,
    /// All-digit stop identifier with a minimum length
    StopId {
        /// Minimum number of digits
        min_length: usize,
    },
    /// Compound location; the bare key holds a stop id, `<name>.latitude` and
    /// friends hold a coordinate. Resolved against the whole query.
    Location {
        /// Minimum number of digits for the stop id form
        min_length: usize,
    },
}

impl Parser {
    /// Enum parser from a list of allowed values
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    /// Schema type for documentation
    #[must_use]
    pub const fn kind(&self) -> SchemaKind {
        match self {
            Self::Integer => SchemaKind::Integer,
            Self::Number => SchemaKind::Number,
            Self::Boolean => SchemaKind::Boolean,
            Self::DateTime(_) => SchemaKind::DateTime,
            Self::String
            | Self::Enum(_)
            | Self::StringList
            | Self::StopId { .. }
            | Self::Location { .. } => SchemaKind::String,
        }
    }

    /// Allowed values of an enum parser
    #[must_use]
    pub fn allowed_values(&self) -> Option<&[String]> {
        match self {
            Self::Enum(values) => Some(values),
            _ => None,
        }
    }

    /// Parse `raw` as the value of parameter `name`
    ///
    /// `now` anchors relative date/time expressions.
    pub fn parse(
        &self,
        name: &str,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<ParamValue, ValidationError> {
        match self {
            Self::String => Ok(ParamValue::String(raw.trim().to_string())),
            Self::Integer => parse_integer(name, raw).map(ParamValue::Integer),
            Self::Number => parse_number(name, raw).map(ParamValue::Number),
            Self::Boolean => parse_boolean(name, raw).map(ParamValue::Boolean),
            Self::DateTime(tz) => parse_when(raw, now, *tz)
                .map(ParamValue::DateTime)
                .ok_or_else(|| ValidationError::new(name, "must be a date and time")),
            Self::Enum(values) => {
                if values.iter().any(|v| v == raw) {
                    Ok(ParamValue::String(raw.to_string()))
                } else {
                    Err(ValidationError::new(
                        name,
                        format!("must be one of {}", values.join(", ")),
                    ))
                }
            },
            Self::StringList => Ok(ParamValue::StringList(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            Self::StopId { min_length } => {
                parse_stop_id(name, raw, *min_length)
                    .map(|id| ParamValue::String(id.as_str().to_string()))
            },
            Self::Location { min_length } => parse_stop_id(name, raw, *min_length)
                .map(|id| ParamValue::Location(Location::Stop(id))),
        }
    }
}

/// Whole value must be numeric; fractions and exponents are truncated
#[allow(clippy::cast_possible_truncation)]
pub(super) fn parse_integer(name: &str, raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(n);
    }
    // "12.7" is accepted as 12
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.abs() < 9.0e15)
        .map(|f| f.trunc() as i64)
        .ok_or_else(|| ValidationError::new(name, "must be an integer"))
}

pub(super) fn parse_number(name: &str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .ok_or_else(|| ValidationError::new(name, "must be a number"))
}

fn parse_boolean(name: &str, raw: &str) -> Result<bool, ValidationError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ValidationError::new(name, "must be a boolean"))
    }
}

fn parse_stop_id(name: &str, raw: &str, min_length: usize) -> Result<StopId, ValidationError> {
    StopId::parse(raw.trim(), min_length).map_err(|e| ValidationError::new(name, e.to_string()))
}
