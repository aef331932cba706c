//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{Coordinate, Location, ParamValue, QueryOptions, StopId};
use proptest::prelude::*;

// ============================================================================
// StopId Property Tests
// ============================================================================

mod stop_id_tests {
    use super::*;

    proptest! {
        #[test]
        fn digit_strings_of_sufficient_length_parse(id in "[0-9]{5,12}") {
            let parsed = StopId::parse(&id, 5);
            prop_assert!(parsed.is_ok());
            let parsed = parsed.unwrap();
            prop_assert_eq!(parsed.as_str(), id.as_str());
        }

        #[test]
        fn short_digit_strings_rejected(id in "[0-9]{1,4}") {
            prop_assert!(StopId::parse(&id, 5).is_err());
        }

        #[test]
        fn any_non_digit_rejected(prefix in "[0-9]{0,5}", bad in "[^0-9]", suffix in "[0-9]{0,5}") {
            let id = format!("{prefix}{bad}{suffix}");
            prop_assert!(StopId::parse(&id, 1).is_err());
        }
    }
}

// ============================================================================
// Location Property Tests
// ============================================================================

mod location_tests {
    use super::*;

    proptest! {
        #[test]
        fn coordinate_pairs_always_carry_lat_lon(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64,
            prefix in "[a-z]{1,8}"
        ) {
            let loc = Location::Coordinate(Coordinate::new(lat, lon));
            let pairs = loc.to_query_pairs(&prefix);
            prop_assert_eq!(pairs.len(), 2);
            prop_assert_eq!(&pairs[0].0, &format!("{prefix}.latitude"));
            prop_assert_eq!(pairs[0].1.parse::<f64>().unwrap(), lat);
            prop_assert_eq!(pairs[1].1.parse::<f64>().unwrap(), lon);
        }

        #[test]
        fn poi_and_address_never_both_emitted(
            poi in "[0-9]{1,6}",
            address in "[a-zA-Z ]{1,20}",
            poi_last in any::<bool>()
        ) {
            let base = Coordinate::new(1.0, 2.0);
            let coord = if poi_last {
                base.with_address(address).with_poi(poi)
            } else {
                base.with_poi(poi).with_address(address)
            };
            let pairs = Location::Coordinate(coord).to_query_pairs("to");
            let has_id = pairs.iter().any(|(k, _)| k == "to.id");
            let has_address = pairs.iter().any(|(k, _)| k == "to.address");
            prop_assert!(has_id != has_address);
        }
    }
}

// ============================================================================
// QueryOptions Property Tests
// ============================================================================

mod query_options_tests {
    use super::*;

    proptest! {
        #[test]
        fn scalar_options_flatten_one_to_one(values in prop::collection::btree_map("[a-z]{1,10}", any::<i64>(), 0..10)) {
            let opts: QueryOptions = values.iter().map(|(k, v)| (k.clone(), *v)).collect();
            let pairs = opts.to_query_pairs();
            prop_assert_eq!(pairs.len(), values.len());
            for (k, v) in pairs {
                prop_assert_eq!(values.get(&k).map(ToString::to_string), Some(v));
            }
        }

        #[test]
        fn string_list_renders_comma_joined(items in prop::collection::vec("[a-z]{1,5}", 0..6)) {
            let rendered = ParamValue::StringList(items.clone()).to_query_value().unwrap();
            prop_assert_eq!(rendered, items.join(","));
        }
    }
}
