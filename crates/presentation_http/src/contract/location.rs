//! Compound location parameters
//!
//! A location named `from` is either a stop id (`from=8011160`) or a
//! coordinate (`from.latitude`, `from.longitude`, optionally `from.name` and
//! one of `from.id` for a POI or `from.address`).

use domain::value_objects::{Coordinate, Location, StopId};

use super::parsers::parse_number;
use super::{RawQuery, ValidationError};

/// Resolve the location named `prefix` from the query
///
/// The stop id form wins over the coordinate form. A POI id wins over an
/// address. Returns `Ok(None)` when neither form is present.
pub fn resolve_location(
    query: &RawQuery,
    prefix: &str,
    min_length: usize,
) -> Result<Option<Location>, ValidationError> {
    if let Some(raw) = query.get(prefix).filter(|v| !v.is_empty()) {
        return StopId::parse(raw.trim(), min_length)
            .map(|id| Some(Location::Stop(id)))
            .map_err(|e| ValidationError::new(prefix, e.to_string()));
    }

    let field = |suffix: &str| {
        let key = format!("{prefix}.{suffix}");
        query
            .get(&key)
            .filter(|v| !v.is_empty())
            .map(|v| (key, v))
    };

    let (Some((lat_key, lat)), Some((lon_key, lon))) = (field("latitude"), field("longitude"))
    else {
        return Ok(None);
    };

    let mut coordinate = Coordinate::new(parse_number(&lat_key, lat)?, parse_number(&lon_key, lon)?);
    if let Some((_, name)) = field("name") {
        coordinate = coordinate.with_name(name.trim());
    }
    if let Some((_, id)) = field("id") {
        coordinate = coordinate.with_poi(id.trim());
    } else if let Some((_, address)) = field("address") {
        coordinate = coordinate.with_address(address.trim());
    }
    Ok(Some(Location::Coordinate(coordinate)))
}
