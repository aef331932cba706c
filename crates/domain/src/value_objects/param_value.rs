//! Typed parameter values produced by query parsing

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::location::Location;

/// A single parsed request parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Free text, already trimmed
    String(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// `true` / `false`
    Boolean(bool),
    /// An instant in time
    DateTime(DateTime<Utc>),
    /// Comma-separated list of strings
    StringList(Vec<String>),
    /// A compound location parameter
    Location(Location),
}

impl ParamValue {
    /// String payload, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric payload; integers widen to floats
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Instant payload, if this is a date/time
    #[must_use]
    pub const fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(t) => Some(*t),
            _ => None,
        }
    }

    /// List payload, if this is a string list
    #[must_use]
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Self::StringList(list) => Some(list),
            _ => None,
        }
    }

    /// Location payload, if this is a location
    #[must_use]
    pub const fn as_location(&self) -> Option<&Location> {
        match self {
            Self::Location(loc) => Some(loc),
            _ => None,
        }
    }

    /// Render a scalar value the way it would appear in a query string
    ///
    /// Returns `None` for locations, which expand into several parameters.
    #[must_use]
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::DateTime(t) => Some(t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::StringList(list) => Some(list.join(",")),
            Self::Location(_) => None,
        }
    }

    /// JSON rendering, used for documentation defaults
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::from(s.as_str()),
            Self::Integer(i) => Value::from(*i),
            Self::Number(n) => Value::from(*n),
            Self::Boolean(b) => Value::from(*b),
            Self::DateTime(t) => Value::from(t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::StringList(list) => Value::from(list.clone()),
            Self::Location(loc) => Value::from(loc.to_string()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(t: DateTime<Utc>) -> Self {
        Self::DateTime(t)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(list: Vec<String>) -> Self {
        Self::StringList(list)
    }
}

impl From<Location> for ParamValue {
    fn from(loc: Location) -> Self {
        Self::Location(loc)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(ParamValue::from("en").as_str(), Some("en"));
        assert_eq!(ParamValue::from(3_i64).as_i64(), Some(3));
        assert_eq!(ParamValue::from(true).as_bool(), Some(true));
        assert_eq!(ParamValue::from(true).as_str(), None);
        assert!(ParamValue::from(1.5).as_i64().is_none());
    }

    #[test]
    fn integers_widen_to_floats() {
        assert_eq!(ParamValue::Integer(2).as_f64(), Some(2.0));
    }

    #[test]
    fn query_value_rendering() {
        let t = Utc.with_ymd_and_hms(2026, 2, 11, 14, 37, 0).unwrap();
        assert_eq!(
            ParamValue::from(t).to_query_value().as_deref(),
            Some("2026-02-11T14:37:00Z")
        );
        assert_eq!(
            ParamValue::from(vec!["a".to_string(), "b".to_string()])
                .to_query_value()
                .as_deref(),
            Some("a,b")
        );
        assert_eq!(ParamValue::from(false).to_query_value().as_deref(), Some("false"));
    }

    #[test]
    fn json_rendering() {
        assert_eq!(ParamValue::from(10_i64).to_json(), serde_json::json!(10));
        assert_eq!(ParamValue::from("en").to_json(), serde_json::json!("en"));
        assert_eq!(ParamValue::from(true).to_json(), serde_json::json!(true));
    }
}
