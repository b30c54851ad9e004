//! Property-based tests for domain value objects and normalization
//!
//! These tests use proptest to verify invariants across many random inputs.

use std::collections::HashSet;

use domain::{GeoLocation, LocationRecord, MapLocation};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

// ============================================================================
// GeoLocation Property Tests
// ============================================================================

mod geo_location_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_create_location(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let loc = GeoLocation::new(lat, lon);
            prop_assert!(loc.is_ok());
        }

        #[test]
        fn out_of_range_latitude_rejected(
            lat in prop_oneof![(-1000.0f64..-90.1f64), (90.1f64..1000.0f64)],
            lon in -180.0f64..=180.0f64
        ) {
            prop_assert!(GeoLocation::new(lat, lon).is_err());
        }

        #[test]
        fn distance_is_symmetric(
            lat1 in -90.0f64..=90.0f64,
            lon1 in -180.0f64..=180.0f64,
            lat2 in -90.0f64..=90.0f64,
            lon2 in -180.0f64..=180.0f64
        ) {
            let a = GeoLocation::new_unchecked(lat1, lon1);
            let b = GeoLocation::new_unchecked(lat2, lon2);
            prop_assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 0.001);
            prop_assert!(a.distance_km(&b) >= 0.0);
        }

        #[test]
        fn bounding_box_contains_center(
            lat in -89.0f64..=89.0f64,
            lon in -179.0f64..=179.0f64,
            radius in 0.1f64..500.0f64
        ) {
            let center = GeoLocation::new_unchecked(lat, lon);
            let (min_lon, min_lat, max_lon, max_lat) = center.bounding_box(radius);
            prop_assert!(min_lat <= lat && lat <= max_lat);
            prop_assert!(min_lon <= lon && lon <= max_lon);
            prop_assert!((-90.0..=90.0).contains(&min_lat) && (-90.0..=90.0).contains(&max_lat));
        }
    }
}

// ============================================================================
// MapLocation Property Tests
// ============================================================================

mod map_location_tests {
    use super::*;

    fn record(display: &str, lat: f64, lon: f64, extra: Map<String, Value>) -> LocationRecord {
        let mut raw = extra;
        raw.insert("display_name".to_string(), Value::String(display.to_string()));
        LocationRecord::new(display, GeoLocation::new_unchecked(lat, lon), raw)
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 ,]{0,20}".prop_map(Value::String),
            Just(json!([1, 2])),
        ]
    }

    proptest! {
        #[test]
        fn normalization_keeps_coordinates(
            display in "[a-zA-Z0-9 ,]{0,80}",
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let location = MapLocation::from_geocoder_result(&record(&display, lat, lon, Map::new()));
            prop_assert_eq!(location.lat.to_bits(), lat.to_bits());
            prop_assert_eq!(location.lon.to_bits(), lon.to_bits());
        }

        #[test]
        fn mistyped_structured_components_never_panic(
            road in scalar(),
            city in scalar(),
            postcode in scalar(),
            category in scalar(),
            name in scalar()
        ) {
            let extra = json!({
                "category": category,
                "name": name,
                "address": { "road": road, "city": city, "postcode": postcode }
            });
            let extra = extra.as_object().cloned().unwrap_or_default();
            let location = MapLocation::from_geocoder_result(&record("x", 1.0, 2.0, extra));

            for field in [&location.name, &location.street, &location.city, &location.post_code] {
                prop_assert!(field.as_ref().is_none_or(|s| !s.trim().is_empty()));
            }
        }

        #[test]
        fn equal_locations_collapse_in_sets(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64,
            name in proptest::option::of("[A-Z][a-z]{1,10}"),
            city_a in "[A-Z][a-z]{1,10}",
            city_b in "[A-Z][a-z]{1,10}"
        ) {
            let a = MapLocation { name: name.clone(), city: Some(city_a), ..MapLocation::new(lat, lon) };
            let b = MapLocation { name, city: Some(city_b), ..MapLocation::new(lat, lon) };
            prop_assert_eq!(&a, &b);

            let set: HashSet<MapLocation> = [a, b].into_iter().collect();
            prop_assert_eq!(set.len(), 1);
        }
    }
}
