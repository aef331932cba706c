//! Location value objects
//!
//! A [`Location`] is either a stop referenced by id or a free coordinate,
//! optionally naming a point of interest or an address. The two are mutually
//! exclusive; "no location given" is modelled by the caller as `Option::None`.

use std::fmt;

use super::stop_id::StopId;

/// A place a journey can start at, end at, or pass through
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// A stop or station identified by its provider id
    Stop(StopId),
    /// A coordinate, possibly describing a POI or an address
    Coordinate(Coordinate),
}

impl Location {
    /// Get the stop id, if this is a stop
    #[must_use]
    pub const fn as_stop(&self) -> Option<&StopId> {
        match self {
            Self::Stop(id) => Some(id),
            Self::Coordinate(_) => None,
        }
    }

    /// Get the coordinate, if this is one
    #[must_use]
    pub const fn as_coordinate(&self) -> Option<&Coordinate> {
        match self {
            Self::Stop(_) => None,
            Self::Coordinate(c) => Some(c),
        }
    }

    /// Express this location as query parameters under `prefix`
    ///
    /// Stops become `prefix=<id>`; coordinates become `prefix.latitude`,
    /// `prefix.longitude` and, when set, `prefix.name` plus one of
    /// `prefix.id` / `prefix.address`.
    #[must_use]
    pub fn to_query_pairs(&self, prefix: &str) -> Vec<(String, String)> {
        match self {
            Self::Stop(id) => vec![(prefix.to_string(), id.to_string())],
            Self::Coordinate(c) => {
                let mut pairs = vec![
                    (format!("{prefix}.latitude"), c.latitude.to_string()),
                    (format!("{prefix}.longitude"), c.longitude.to_string()),
                ];
                if let Some(name) = &c.name {
                    pairs.push((format!("{prefix}.name"), name.clone()));
                }
                match &c.place {
                    Some(Place::Poi(id)) => pairs.push((format!("{prefix}.id"), id.clone())),
                    Some(Place::Address(addr)) => {
                        pairs.push((format!("{prefix}.address"), addr.clone()));
                    },
                    None => {},
                }
                pairs
            },
        }
    }
}

impl From<StopId> for Location {
    fn from(id: StopId) -> Self {
        Self::Stop(id)
    }
}

impl From<Coordinate> for Location {
    fn from(c: Coordinate) -> Self {
        Self::Coordinate(c)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop(id) => write!(f, "stop {id}"),
            Self::Coordinate(c) => write!(f, "{c}"),
        }
    }
}

/// What a coordinate refers to, beyond its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Place {
    /// A point of interest with a provider id
    Poi(String),
    /// A street address
    Address(String),
}

/// A geographic position with optional naming
///
/// Coordinates are not range-checked: the provider decides what it accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Display name
    pub name: Option<String>,
    /// POI or address this coordinate describes
    pub place: Option<Place>,
}

impl Coordinate {
    /// Create a bare coordinate
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
            place: None,
        }
    }

    /// Attach a display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark this coordinate as a POI
    #[must_use]
    pub fn with_poi(mut self, id: impl Into<String>) -> Self {
        self.place = Some(Place::Poi(id.into()));
        self
    }

    /// Mark this coordinate as an address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.place = Some(Place::Address(address.into()));
        self
    }

    /// POI id, if this coordinate is a POI
    #[must_use]
    pub fn poi_id(&self) -> Option<&str> {
        match &self.place {
            Some(Place::Poi(id)) => Some(id),
            _ => None,
        }
    }

    /// Address, if this coordinate is an address
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        match &self.place {
            Some(Place::Address(addr)) => Some(addr),
            _ => None,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}

/// A rectangular area, used for radar queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Northern latitude
    pub north: f64,
    /// Western longitude
    pub west: f64,
    /// Southern latitude
    pub south: f64,
    /// Eastern longitude
    pub east: f64,
}

impl BoundingBox {
    /// Query parameters describing this box
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("north".to_string(), self.north.to_string()),
            ("west".to_string(), self.west.to_string()),
            ("south".to_string(), self.south.to_string()),
            ("east".to_string(), self.east.to_string()),
        ]
    }
}
