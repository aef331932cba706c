//! Parameter declarations shared by several routes

use domain::value_objects::ProviderProfile;

use crate::contract::{ParameterRegistry, ParameterSpec, Parser, RegistryError};

/// Name of the pretty-print toggle every route accepts
pub const PRETTY: &str = "pretty";

pub fn pretty() -> ParameterSpec {
    ParameterSpec::with_default(PRETTY, "Pretty-print JSON responses?", Parser::Boolean, true)
}

pub fn language(profile: &ProviderProfile) -> ParameterSpec {
    ParameterSpec::with_default(
        "language",
        "Language of the results.",
        Parser::String,
        profile.default_language.as_str(),
    )
}

pub fn flag(name: &str, description: &str, default: bool) -> ParameterSpec {
    ParameterSpec::with_default(name, description, Parser::Boolean, default)
}

pub fn count(name: &str, description: &str, default: i64) -> ParameterSpec {
    ParameterSpec::with_default(name, description, Parser::Integer, default)
}

pub fn date_time(profile: &ProviderProfile, name: &str, description: &str, absent: &str) -> ParameterSpec {
    ParameterSpec::described(name, description, Parser::DateTime(profile.timezone), absent)
}

pub fn stop_id(profile: &ProviderProfile, name: &str, description: &str) -> ParameterSpec {
    ParameterSpec::required(
        name,
        description,
        Parser::StopId {
            min_length: profile.stop_id_min_length,
        },
    )
}

pub fn location(profile: &ProviderProfile, name: &str, description: &str) -> ParameterSpec {
    ParameterSpec::required(
        name,
        description,
        Parser::Location {
            min_length: profile.stop_id_min_length,
        },
    )
}

pub fn coordinate(name: &str, description: &str) -> ParameterSpec {
    ParameterSpec::required(name, description, Parser::Number)
}

pub fn lines_of_stops() -> ParameterSpec {
    flag("linesOfStops", "Parse & return lines of each stop/station?", false)
}

pub fn remarks() -> ParameterSpec {
    flag("remarks", "Parse & return hints & warnings?", true)
}

pub fn stopovers(default: bool) -> ParameterSpec {
    flag("stopovers", "Fetch & parse stopovers on the way?", default)
}

pub fn polylines(name: &str, default: bool) -> ParameterSpec {
    flag(name, "Fetch & parse a shape for each vehicle/leg?", default)
}

pub fn sub_stops() -> ParameterSpec {
    flag("subStops", "Parse & return sub-stops of stations?", true)
}

pub fn entrances() -> ParameterSpec {
    flag("entrances", "Parse & return entrances of stops/stations?", true)
}

/// One boolean filter per transport mode of the profile
pub fn products(profile: &ProviderProfile) -> Result<ParameterRegistry, RegistryError> {
    ParameterRegistry::from_specs(profile.products.iter().map(|product| {
        flag(
            &product.id,
            &format!("Include {}?", product.label()),
            product.default,
        )
    }))
}
