//! The transit route catalogue
//!
//! [`assemble`] turns a provider profile into the route table. Optional
//! routes are only included when the profile's capabilities advertise them;
//! that decision is made here, once.

use domain::value_objects::ProviderProfile;

use super::params::{
    coordinate, count, date_time, entrances, flag, language, lines_of_stops, location, polylines,
    pretty, products, remarks, stop_id, stopovers, sub_stops,
};
use super::table::{CachePolicy, Endpoint, RouteDescriptor, RouteDoc, RouteError, RouteTable};
use crate::contract::{ParameterRegistry, ParameterSpec, Parser};

/// Build the route table for `profile`
///
/// # Errors
///
/// Fails if two parameters of one route share a name (for example a product
/// id that collides with a regular parameter) or the table is inconsistent.
pub fn assemble(profile: &ProviderProfile) -> Result<RouteTable, RouteError> {
    let caps = profile.capabilities;

    let mut routes = Vec::new();
    if caps.reachable_from {
        routes.push(reachable_from(profile)?);
    }
    routes.push(stop(profile)?);
    routes.push(departures(profile, Endpoint::Departures)?);
    routes.push(departures(profile, Endpoint::Arrivals)?);
    routes.push(journeys(profile)?);
    if caps.refresh_journey {
        routes.push(refresh_journey(profile)?);
    }
    if caps.trip {
        routes.push(trip(profile)?);
    }
    if caps.trips_by_name {
        routes.push(trips(profile)?);
    }
    routes.push(nearby(profile)?);
    routes.push(locations(profile)?);
    if caps.radar {
        routes.push(radar(profile)?);
    }

    RouteTable::from_routes(routes)
}

/// Query registry with `pretty` appended
fn query(specs: Vec<ParameterSpec>) -> Result<ParameterRegistry, RouteError> {
    let registry = ParameterRegistry::from_specs(specs)?;
    Ok(registry.merge(ParameterRegistry::from_specs([pretty()])?)?)
}

/// Query registry with the product filters and `pretty` appended
fn query_with_products(
    profile: &ProviderProfile,
    specs: Vec<ParameterSpec>,
) -> Result<ParameterRegistry, RouteError> {
    let registry = ParameterRegistry::from_specs(specs)?.merge(products(profile)?)?;
    Ok(registry.merge(ParameterRegistry::from_specs([pretty()])?)?)
}

fn stop_path(profile: &ProviderProfile) -> Result<ParameterRegistry, RouteError> {
    Ok(ParameterRegistry::from_specs([stop_id(
        profile,
        "id",
        "stop/station ID",
    )])?)
}

fn stop(profile: &ProviderProfile) -> Result<RouteDescriptor, RouteError> {
    Ok(RouteDescriptor {
        name: "stop".to_string(),
        path: "/stops/{id}".to_string(),
        endpoint: Endpoint::Stop,
        path_params: stop_path(profile)?,
        query_params: query(vec![lines_of_stops(), language(profile)])?,
        cache: CachePolicy::seconds(300),
        doc: Some(RouteDoc::new(
            "Finds a stop/station by ID.",
            "Returns a single stop/station, as provided by the upstream.",
        )),
    })
}

/// `departures` and `arrivals` share their contract
fn departures(profile: &ProviderProfile, endpoint: Endpoint) -> Result<RouteDescriptor, RouteError> {
    let (name, path, noun) = match endpoint {
        Endpoint::Arrivals => ("arrivals", "/stops/{id}/arrivals", "arrivals"),
        _ => ("departures", "/stops/{id}/departures", "departures"),
    };
    let caps = profile.capabilities;

    let mut specs = vec![
        date_time(profile, "when", "Date & time to get departures for.", "*now*"),
        ParameterSpec::described(
            "direction",
            "Filter departures by direction.",
            Parser::StopId {
                min_length: profile.stop_id_min_length,
            },
            "–",
        ),
        count("duration", "Show departures for how many minutes?", 10),
        ParameterSpec::described(
            "results",
            "Max. number of departures.",
            Parser::Integer,
            "*whatever HAFAS wants*",
        ),
        lines_of_stops(),
        remarks(),
        language(profile),
    ];
    if caps.departures_related_stations {
        specs.push(flag(
            "includeRelatedStations",
            "Fetch departures at related stops, e.g. those that belong together on the metro map?",
            true,
        ));
    }
    if caps.departures_stopovers {
        specs.push(stopovers(false));
    }

    Ok(RouteDescriptor {
        name: name.to_string(),
        path: path.to_string(),
        endpoint,
        path_params: stop_path(profile)?,
        query_params: query_with_products(profile, specs)?,
        cache: CachePolicy::seconds(30),
        doc: Some(RouteDoc::new(
            format!("Fetches {noun} at a stop/station."),
            format!(
                "Returns {noun} within a time window, with a `next` link to the following window."
            ),
        )),
    })
}

fn journeys(profile: &ProviderProfile) -> Result<RouteDescriptor, RouteError> {
    let tz_when = |name: &str, description: &str| date_time(profile, name, description, "*now*");
    let specs = vec![
        location(profile, "from", "Origin: a stop/station ID, or `from.latitude` & `from.longitude` plus optional `from.name`, `from.id` or `from.address`."),
        location(profile, "to", "Destination, in the same forms as `from`."),
        ParameterSpec::described(
            "via",
            "Stop/station ID the journeys must pass through.",
            Parser::Location {
                min_length: profile.stop_id_min_length,
            },
            "–",
        ),
        tz_when("departure", "Compute journeys departing at this date/time. Mutually exclusive with `arrival`."),
        tz_when("arrival", "Compute journeys arriving at this date/time. Mutually exclusive with `departure`."),
        ParameterSpec::described(
            "earlierThan",
            "Compute journeys \"before\" an `earlierRef`.",
            Parser::String,
            "–",
        ),
        ParameterSpec::described(
            "laterThan",
            "Compute journeys \"after\" a `laterRef`.",
            Parser::String,
            "–",
        ),
        count("results", "Max. number of journeys.", 3),
        stopovers(false),
        ParameterSpec::described(
            "transfers",
            "Maximum number of transfers.",
            Parser::Integer,
            "*let HAFAS decide*",
        ),
        count("transferTime", "Minimum time in minutes for a single transfer.", 0),
        ParameterSpec::with_default(
            "accessibility",
            "`partial` or `complete`.",
            Parser::one_of(["none", "partial", "complete"]),
            "none",
        ),
        flag("bike", "Compute only bike-friendly journeys?", false),
        flag("startWithWalking", "Consider walking to nearby stations at the beginning of a journey?", true),
        ParameterSpec::with_default(
            "walkingSpeed",
            "`slow`, `normal` or `fast`.",
            Parser::one_of(["slow", "normal", "fast"]),
            "normal",
        ),
        flag("tickets", "Return information about available tickets?", false),
        polylines("polylines", false),
        sub_stops(),
        entrances(),
        remarks(),
        flag("scheduledDays", "Parse & return dates the journey is valid on?", false),
        language(profile),
    ];

    Ok(RouteDescriptor {
        name: "journeys".to_string(),
        path: "/journeys".to_string(),
        endpoint: Endpoint::Journeys,
        path_params: ParameterRegistry::new(),
        query_params: query_with_products(profile, specs)?,
        cache: CachePolicy::seconds(60),
        doc: Some(RouteDoc::new(
            "Finds journeys from A to B.",
            "Uses the upstream's `earlierRef`/`laterRef` tokens for `prev`/`next` links.",
        )),
    })
}

fn refresh_journey(profile: &ProviderProfile) -> Result<RouteDescriptor, RouteError> {
    let specs = vec![
        stopovers(false),
        flag("tickets", "Return information about available tickets?", false),
        polylines("polylines", false),
        sub_stops(),
        entrances(),
        remarks(),
        language(profile),
    ];
    Ok(RouteDescriptor {
        name: "refreshJourney".to_string(),
        path: "/journeys/{ref}".to_string(),
        endpoint: Endpoint::RefreshJourney,
        path_params: ParameterRegistry::from_specs([ParameterSpec::required(
            "ref",
            "The journey's `refreshToken`.",
            Parser::String,
        )])?,
        query_params: query(specs)?,
        cache: CachePolicy::seconds(60),
        doc: Some(RouteDoc::new(
            "Fetches up-to-date realtime data for a journey computed before.",
            "Takes the `refreshToken` of a journey and returns its current state.",
        )),
    })
}

fn trip(profile: &ProviderProfile) -> Result<RouteDescriptor, RouteError> {
    let specs = vec![
        ParameterSpec::required("lineName", "Line name of the trip.", Parser::String),
        flag("stopovers", "Fetch & parse stopovers on the way?", true),
        remarks(),
        polylines("polyline", false),
        language(profile),
    ];
    Ok(RouteDescriptor {
        name: "trip".to_string(),
        path: "/trips/{id}".to_string(),
        endpoint: Endpoint::Trip,
        path_params: ParameterRegistry::from_specs([ParameterSpec::required(
            "id",
            "trip ID",
            Parser::String,
        )])?,
        query_params: query(specs)?,
        cache: CachePolicy::seconds(30),
        doc: Some(RouteDoc::new(
            "Fetches a trip by ID.",
            "A trip is a vehicle stopping at a set of stops at specific times.",
        )),
    })
}

fn trips(profile: &ProviderProfile) -> Result<RouteDescriptor, RouteError> {
    let now_10s = "*now, with 10s accuracy*";
    let specs = vec![
        ParameterSpec::with_default("query", "line name or Fahrtnummer", Parser::String, "*"),
        date_time(profile, "when", "Date & time to get trips for.", now_10s),
        date_time(
            profile,
            "fromWhen",
            "Together with untilWhen, forms a time frame to get trips for. Mutually exclusive with `when`.",
            now_10s,
        ),
        date_time(
            profile,
            "untilWhen",
            "Together with fromWhen, forms a time frame to get trips for. Mutually exclusive with `when`.",
            "–",
        ),
        flag("onlyCurrentlyRunning", "Only return trips that run within the specified time frame.", true),
        ParameterSpec::described(
            "currentlyStoppingAt",
            "Only return trips that stop at the specified stop within the specified time frame.",
            Parser::StopId {
                min_length: profile.stop_id_min_length,
            },
            "–",
        ),
        ParameterSpec::described(
            "lineName",
            "Only return trips with the specified line name.",
            Parser::String,
            "–",
        ),
        ParameterSpec::described(
            "operatorNames",
            "Only return trips operated by operators specified by their names, separated by commas.",
            Parser::StringList,
            "–",
        ),
        flag("stopovers", "Fetch & parse stopovers of each trip?", true),
        remarks(),
        sub_stops(),
        entrances(),
        language(profile),
    ];
    Ok(RouteDescriptor {
        name: "trips".to_string(),
        path: "/trips".to_string(),
        endpoint: Endpoint::Trips,
        path_params: ParameterRegistry::new(),
        query_params: query_with_products(profile, specs)?,
        cache: CachePolicy::seconds(30),
        doc: Some(RouteDoc::new(
            "Fetches all trips within a specified time frame (default: *now*) that match certain criteria.",
            "Without `when`, `fromWhen` or `untilWhen` the route redirects to itself with `when` pinned to the current time, rounded to 10 seconds.",
        )),
    })
}

fn nearby(profile: &ProviderProfile) -> Result<RouteDescriptor, RouteError> {
    let specs = vec![
        coordinate("latitude", "Latitude of the location."),
        coordinate("longitude", "Longitude of the location."),
        count("results", "maximum number of results", 8),
        ParameterSpec::described(
            "distance",
            "maximum walking distance in meters",
            Parser::Integer,
            "*whatever the provider returns*",
        ),
        flag("stops", "Return stops/stations?", true),
        flag("poi", "Return points of interest?", false),
        lines_of_stops(),
        language(profile),
    ];
    Ok(RouteDescriptor {
        name: "nearby".to_string(),
        path: "/locations/nearby".to_string(),
        endpoint: Endpoint::Nearby,
        path_params: ParameterRegistry::new(),
        query_params: query(specs)?,
        cache: CachePolicy::seconds(300),
        doc: Some(RouteDoc::new(
            "Finds stops/stations & POIs close to a geolocation.",
            "Returns a list of locations, closest first.",
        )),
    })
}

fn locations(profile: &ProviderProfile) -> Result<RouteDescriptor, RouteError> {
    let specs = vec![
        ParameterSpec::required("query", "The term to search for.", Parser::String),
        flag("fuzzy", "Find more than exact matches?", true),
        count("results", "How many search results?", 10),
        flag("stops", "Show stops/stations?", true),
        flag("addresses", "Show addresses?", true),
        flag("poi", "Show points of interest?", true),
        lines_of_stops(),
        language(profile),
    ];
    Ok(RouteDescriptor {
        name: "locations".to_string(),
        path: "/locations".to_string(),
        endpoint: Endpoint::Locations,
        path_params: ParameterRegistry::new(),
        query_params: query(specs)?,
        cache: CachePolicy::seconds(300),
        doc: Some(RouteDoc::new(
            "Finds stops/stations, POIs and addresses matching a query.",
            "A free-text search across all location kinds.",
        )),
    })
}

fn reachable_from(profile: &ProviderProfile) -> Result<RouteDescriptor, RouteError> {
    let specs = vec![
        coordinate("latitude", "Latitude of the address."),
        coordinate("longitude", "Longitude of the address."),
        ParameterSpec::required("address", "The address.", Parser::String),
        date_time(profile, "when", "Date & time to compute the reachability for.", "*now*"),
        count("maxTransfers", "Maximum number of transfers.", 5),
        ParameterSpec::described(
            "maxDuration",
            "Maximum travel duration, in minutes.",
            Parser::Integer,
            "*infinite*",
        ),
        language(profile),
    ];
    Ok(RouteDescriptor {
        name: "reachableFrom".to_string(),
        path: "/stops/reachable-from".to_string(),
        endpoint: Endpoint::ReachableFrom,
        path_params: ParameterRegistry::new(),
        query_params: query_with_products(profile, specs)?,
        cache: CachePolicy::seconds(60),
        doc: Some(RouteDoc::new(
            "Finds stops/stations reachable within a certain time from an address.",
            "Results are grouped by travel duration.",
        )),
    })
}

fn radar(profile: &ProviderProfile) -> Result<RouteDescriptor, RouteError> {
    let specs = vec![
        coordinate("north", "Northern latitude."),
        coordinate("west", "Western longitude."),
        coordinate("south", "Southern latitude."),
        coordinate("east", "Eastern longitude."),
        count("results", "Max. number of vehicles.", 256),
        count("duration", "Compute frames for the next n seconds.", 30),
        count("frames", "Number of frames to compute.", 3),
        polylines("polylines", true),
        language(profile),
    ];
    Ok(RouteDescriptor {
        name: "radar".to_string(),
        path: "/radar".to_string(),
        endpoint: Endpoint::Radar,
        path_params: ParameterRegistry::new(),
        query_params: query(specs)?,
        cache: CachePolicy::none(),
        doc: Some(RouteDoc::new(
            "Finds all vehicles currently in an area.",
            "Returns vehicle positions within a bounding box, with movement frames.",
        )),
    })
}
