//! Query contract processing

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use domain::value_objects::{ParamValue, QueryOptions};

use super::{Fallback, ParameterRegistry, Parser, ValidationError, resolve_location};

/// Decoded query string, in request order
///
/// When a key repeats, the first occurrence is the one that counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    pairs: Vec<(String, String)>,
}

impl RawQuery {
    /// Decode an `application/x-www-form-urlencoded` query string
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// Build from already decoded pairs
    #[must_use]
    pub const fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Outcome of applying a registry to a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryContractResult {
    /// Parsed values, defaults included
    pub options: QueryOptions,
    /// Names the client actually supplied
    pub supplied: BTreeSet<String>,
    /// Every rejected parameter, in registry order
    pub errors: Vec<ValidationError>,
}

impl QueryContractResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the client supplied `name` (as opposed to it being defaulted)
    #[must_use]
    pub fn was_supplied(&self, name: &str) -> bool {
        self.supplied.contains(name)
    }

    /// Split into options or the collected errors
    pub fn into_result(self) -> Result<(QueryOptions, BTreeSet<String>), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok((self.options, self.supplied))
        } else {
            Err(self.errors)
        }
    }
}

/// Apply `registry` to `query`, resolving relative times against the clock
#[must_use]
pub fn parse_query(registry: &ParameterRegistry, query: &RawQuery) -> QueryContractResult {
    parse_query_at(registry, query, Utc::now())
}

/// Apply `registry` to `query`
///
/// Defaults are seeded first, then every declared parameter present in the
/// query is parsed. Undeclared keys are ignored. Errors are collected, not
/// short-circuited, and missing required parameters are reported last for
/// each name.
#[must_use]
pub fn parse_query_at(
    registry: &ParameterRegistry,
    query: &RawQuery,
    now: DateTime<Utc>,
) -> QueryContractResult {
    let mut result = QueryContractResult::default();

    for spec in registry {
        let name = spec.name();

        let parsed: Result<Option<ParamValue>, ValidationError> = match spec.parser() {
            Parser::Location { min_length } => {
                resolve_location(query, name, *min_length).map(|loc| loc.map(ParamValue::Location))
            },
            parser => query
                .get(name)
                .map(|raw| parser.parse(name, raw, now))
                .transpose(),
        };

        match parsed {
            Ok(Some(value)) => {
                result.options.insert(name, value);
                result.supplied.insert(name.to_string());
            },
            Ok(None) => match spec.fallback() {
                Fallback::Default(value) => result.options.insert(name, value.clone()),
                Fallback::Required => result.errors.push(ValidationError::missing(name)),
                Fallback::Described(_) => {},
            },
            Err(e) => result.errors.push(e),
        }
    }

    result
}
