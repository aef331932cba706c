//! Parameter specifications and registries

use domain::value_objects::ParamValue;

use super::{Parser, RegistryError};

/// What happens when a parameter is not supplied
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    /// The request is rejected
    Required,
    /// This value is used
    Default(ParamValue),
    /// The parameter is omitted; the text tells clients what that means
    Described(String),
}

/// Declaration of a single path or query parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: String,
    description: String,
    parser: Parser,
    fallback: Fallback,
    visible_in_docs: bool,
}

impl ParameterSpec {
    fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parser: Parser,
        fallback: Fallback,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parser,
            fallback,
            visible_in_docs: true,
        }
    }

    /// A parameter that must be supplied
    pub fn required(name: impl Into<String>, description: impl Into<String>, parser: Parser) -> Self {
        Self::new(name, description, parser, Fallback::Required)
    }

    /// A parameter with a machine-readable default
    pub fn with_default(
        name: impl Into<String>,
        description: impl Into<String>,
        parser: Parser,
        default: impl Into<ParamValue>,
    ) -> Self {
        Self::new(name, description, parser, Fallback::Default(default.into()))
    }

    /// An optional parameter whose absence is explained in prose
    pub fn described(
        name: impl Into<String>,
        description: impl Into<String>,
        parser: Parser,
        default_description: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            description,
            parser,
            Fallback::Described(default_description.into()),
        )
    }

    /// Leave this parameter out of the generated documentation
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible_in_docs = false;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn parser(&self) -> &Parser {
        &self.parser
    }

    #[must_use]
    pub const fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self.fallback, Fallback::Required)
    }

    /// Machine-readable default, if any
    #[must_use]
    pub const fn default_value(&self) -> Option<&ParamValue> {
        match &self.fallback {
            Fallback::Default(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible_in_docs
    }
}

/// Ordered, name-unique set of parameter specifications
///
/// Built once at startup and read-only afterwards. Declaration order is kept
/// so documentation and URI templates are stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterRegistry {
    specs: Vec<ParameterSpec>,
}

impl ParameterRegistry {
    /// Create an empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// Build a registry, rejecting duplicate names
    pub fn from_specs(specs: impl IntoIterator<Item = ParameterSpec>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for spec in specs {
            registry.insert(spec)?;
        }
        Ok(registry)
    }

    /// Add a parameter; a name that is already declared is a conflict
    pub fn insert(&mut self, spec: ParameterSpec) -> Result<(), RegistryError> {
        if self.contains(spec.name()) {
            return Err(RegistryError::Conflict {
                name: spec.name().to_string(),
            });
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Union of two registries; any shared name is a conflict
    pub fn merge(mut self, other: Self) -> Result<Self, RegistryError> {
        for spec in other.specs {
            self.insert(spec)?;
        }
        Ok(self)
    }

    /// Union where `other` wins on shared names
    ///
    /// Overridden parameters keep their original position.
    #[must_use]
    pub fn overlay(mut self, other: Self) -> Self {
        for spec in other.specs {
            match self.specs.iter_mut().find(|s| s.name == spec.name) {
                Some(existing) => *existing = spec,
                None => self.specs.push(spec),
            }
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.iter()
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(ParameterSpec::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParameterRegistry {
    type Item = &'a ParameterSpec;
    type IntoIter = std::slice::Iter<'a, ParameterSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(default: i64) -> ParameterSpec {
        ParameterSpec::with_default("results", "Max. number of results.", Parser::Integer, default)
    }

    fn language() -> ParameterSpec {
        ParameterSpec::with_default("language", "Language of the results.", Parser::String, "en")
    }

    #[test]
    fn fallback_accessors() {
        let spec = results(3);
        assert!(!spec.is_required());
        assert_eq!(spec.default_value(), Some(&ParamValue::Integer(3)));

        let spec = ParameterSpec::required("query", "Search text.", Parser::String);
        assert!(spec.is_required());
        assert_eq!(spec.default_value(), None);

        let spec = ParameterSpec::described("when", "Date & time.", Parser::String, "*now*");
        assert_eq!(spec.fallback(), &Fallback::Described("*now*".into()));
    }

    #[test]
    fn hidden_specs_are_not_visible() {
        assert!(results(3).is_visible());
        assert!(!results(3).hidden().is_visible());
    }

    #[test]
    fn from_specs_rejects_duplicates() {
        let err = ParameterRegistry::from_specs([results(3), results(5)]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Conflict {
                name: "results".into()
            }
        );
    }

    #[test]
    fn merge_keeps_order() {
        let a = ParameterRegistry::from_specs([results(3)]).unwrap();
        let b = ParameterRegistry::from_specs([language()]).unwrap();
        let merged = a.merge(b).unwrap();
        assert_eq!(merged.names().collect::<Vec<_>>(), ["results", "language"]);
    }

    #[test]
    fn merge_conflict_is_an_error() {
        let a = ParameterRegistry::from_specs([results(3)]).unwrap();
        let b = ParameterRegistry::from_specs([results(10)]).unwrap();
        assert!(a.merge(b).is_err());
    }

    #[test]
    fn overlay_later_wins_in_place() {
        let a = ParameterRegistry::from_specs([results(3), language()]).unwrap();
        let b = ParameterRegistry::from_specs([results(10)]).unwrap();
        let merged = a.overlay(b);
        assert_eq!(merged.names().collect::<Vec<_>>(), ["results", "language"]);
        assert_eq!(
            merged.get("results").and_then(ParameterSpec::default_value),
            Some(&ParamValue::Integer(10))
        );
    }
}
