//! Route descriptors and the assembled route table

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::contract::{ParameterRegistry, RegistryError};

/// Which provider operation a route invokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Stop,
    Departures,
    Arrivals,
    Journeys,
    RefreshJourney,
    Trip,
    Trips,
    Nearby,
    Locations,
    ReachableFrom,
    Radar,
}

/// How long clients and CDNs may keep a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CachePolicy {
    /// `None` means no caching directives are sent
    pub ttl_secs: Option<u64>,
}

impl CachePolicy {
    #[must_use]
    pub const fn seconds(ttl: u64) -> Self {
        Self { ttl_secs: Some(ttl) }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self { ttl_secs: None }
    }
}

/// Prose documentation of a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDoc {
    pub summary: String,
    pub description: String,
}

impl RouteDoc {
    pub fn new(summary: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: description.into(),
        }
    }
}

/// Everything the engine knows about one `GET` route
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// Unique name, used for discovery links
    pub name: String,
    /// Path with `{name}` segments
    pub path: String,
    pub endpoint: Endpoint,
    pub path_params: ParameterRegistry,
    pub query_params: ParameterRegistry,
    pub cache: CachePolicy,
    /// Routes without documentation are left out of the OpenAPI document
    pub doc: Option<RouteDoc>,
}

impl RouteDescriptor {
    /// Names of the `{name}` segments of the path, in order
    pub fn path_segment_names(&self) -> impl Iterator<Item = &str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
    }

    /// RFC 6570 template, e.g. `/stops{/id}/departures{?when,duration}`
    #[must_use]
    pub fn uri_template(&self) -> String {
        let mut template = String::new();
        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    template.push_str("{/");
                    template.push_str(name);
                    template.push('}');
                },
                None => {
                    template.push('/');
                    template.push_str(segment);
                },
            }
        }
        if template.is_empty() {
            template.push('/');
        }
        if !self.query_params.is_empty() {
            let names: Vec<&str> = self.query_params.names().collect();
            template.push_str("{?");
            template.push_str(&names.join(","));
            template.push('}');
        }
        template
    }
}

/// Errors detected while assembling the route table
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route name {name:?} is used twice")]
    DuplicateName { name: String },

    #[error("route {route:?} has path segment {{{name}}} without a declared parameter")]
    UnknownPathParameter { route: String, name: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// The immutable set of routes served by the process
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    /// Validate and freeze a list of descriptors
    ///
    /// # Errors
    ///
    /// Fails on duplicate route names and on path segments that have no
    /// path parameter declaration.
    pub fn from_routes(routes: Vec<RouteDescriptor>) -> Result<Self, RouteError> {
        let mut names = BTreeSet::new();
        for route in &routes {
            if !names.insert(route.name.as_str()) {
                return Err(RouteError::DuplicateName {
                    name: route.name.clone(),
                });
            }
            if let Some(name) = route
                .path_segment_names()
                .find(|name| !route.path_params.contains(name))
            {
                return Err(RouteError::UnknownPathParameter {
                    route: route.name.clone(),
                    name: name.to_string(),
                });
            }
        }
        Ok(Self { routes })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// `{ "<name>Url": "<uri template>", ... }`
    #[must_use]
    pub fn discovery(&self) -> Value {
        let mut links = Map::new();
        for route in &self.routes {
            links.insert(format!("{}Url", route.name), Value::from(route.uri_template()));
        }
        Value::Object(links)
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteDescriptor;
    type IntoIter = std::slice::Iter<'a, RouteDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ParameterSpec, Parser};

    fn route(name: &str, path: &str, path_params: &[&str], query: &[&str]) -> RouteDescriptor {
        RouteDescriptor {
            name: name.to_string(),
            path: path.to_string(),
            endpoint: Endpoint::Stop,
            path_params: ParameterRegistry::from_specs(
                path_params
                    .iter()
                    .map(|p| ParameterSpec::required(*p, "", Parser::String)),
            )
            .unwrap(),
            query_params: ParameterRegistry::from_specs(
                query
                    .iter()
                    .map(|p| ParameterSpec::with_default(*p, "", Parser::Boolean, false)),
            )
            .unwrap(),
            cache: CachePolicy::none(),
            doc: None,
        }
    }

    #[test]
    fn template_substitutes_path_segments() {
        let r = route("departures", "/stops/{id}/departures", &["id"], &["when", "duration"]);
        assert_eq!(r.uri_template(), "/stops{/id}/departures{?when,duration}");
    }

    #[test]
    fn template_omits_empty_query_block() {
        let r = route("stop", "/stops/{id}", &["id"], &[]);
        assert_eq!(r.uri_template(), "/stops{/id}");
    }

    #[test]
    fn template_keeps_declaration_order() {
        let r = route("locations", "/locations", &[], &["query", "fuzzy", "results"]);
        assert_eq!(r.uri_template(), "/locations{?query,fuzzy,results}");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = RouteTable::from_routes(vec![
            route("stop", "/stops/{id}", &["id"], &[]),
            route("stop", "/stations/{id}", &["id"], &[]),
        ])
        .unwrap_err();
        assert!(matches!(err, RouteError::DuplicateName { ref name } if name == "stop"));
    }

    #[test]
    fn undeclared_path_segment_is_rejected() {
        let err = RouteTable::from_routes(vec![route("trip", "/trips/{id}", &[], &[])]).unwrap_err();
        assert!(matches!(err, RouteError::UnknownPathParameter { ref name, .. } if name == "id"));
    }

    #[test]
    fn discovery_maps_names_to_templates() {
        let table = RouteTable::from_routes(vec![
            route("stop", "/stops/{id}", &["id"], &["pretty"]),
            route("radar", "/radar", &[], &[]),
        ])
        .unwrap();
        let doc = table.discovery();
        assert_eq!(doc["stopUrl"], "/stops{/id}{?pretty}");
        assert_eq!(doc["radarUrl"], "/radar");
        assert_eq!(table.len(), 2);
        assert!(table.get("radar").is_some());
    }
}
