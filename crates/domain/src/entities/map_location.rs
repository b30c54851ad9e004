//! Normalized map location
//!
//! [`MapLocation::from_geocoder_result`] turns a [`LocationRecord`] into a
//! uniform record. Every component is extracted independently: a provider that
//! omits or mangles one component leaves that field `None` and never fails the
//! whole record.
//!
//! Components come from the structured `address` object when the provider
//! returned one. Otherwise they are read off the comma-separated display
//! string from right to left: country, then postcode (if the segment contains
//! a digit), state, county (if it carries a county-like suffix) and city.
//! Whatever remains on the left holds the place name and the street.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::LocationRecord;
use crate::value_objects::GeoLocation;

/// Categories whose leading display segment is an address, not a name
const UNNAMED_CATEGORIES: &[&str] = &["highway", "place", "boundary", "building", "landuse"];

/// Result types that denote an administrative area rather than a spot in it
const AREA_TYPES: &[&str] = &[
    "city",
    "town",
    "village",
    "hamlet",
    "municipality",
    "administrative",
    "county",
    "state",
    "country",
];

/// Suffixes identifying a county-level display segment
const COUNTY_SUFFIXES: &[&str] = &[" County", " Parish", " Borough"];

/// Structured keys for the settlement level, in order of preference
const CITY_KEYS: &[&str] = &["city", "town", "village", "hamlet", "municipality"];

/// Structured keys for the street name, in order of preference
const ROAD_KEYS: &[&str] = &["road", "pedestrian", "footway", "path"];

/// A geocoded place in normalized form
///
/// Equality and hashing consider only the identifying fields
/// (`lat`, `lon`, `name`), so two lookups of the same place compare equal
/// even if the provider returned different amounts of detail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapLocation {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Name of the place (business, venue), absent for plain addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Provider's place type, e.g. `supermarket`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Street with house number when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// URL of a display icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl MapLocation {
    /// A location that carries nothing but coordinates
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ..Self::default()
        }
    }

    /// A location that carries nothing but the given point
    #[must_use]
    pub fn from_point(point: GeoLocation) -> Self {
        Self::new(point.latitude(), point.longitude())
    }

    /// The coordinates as a point
    #[must_use]
    pub const fn point(&self) -> GeoLocation {
        GeoLocation::new_unchecked(self.lat, self.lon)
    }

    /// Normalize a raw geocoder hit
    #[must_use]
    pub fn from_geocoder_result(record: &LocationRecord) -> Self {
        let raw = &record.raw;
        let segments = display_segments(record);
        let name = extract_name(raw, &segments);

        let components = match raw.get("address").and_then(Value::as_object) {
            Some(address) => AddressComponents::from_structured(address),
            None => AddressComponents::from_display(segments, name.as_deref(), is_area(raw)),
        };

        Self {
            lat: record.point.latitude(),
            lon: record.point.longitude(),
            name,
            kind: component(raw, "type"),
            street: components.street,
            city: components.city,
            county: components.county,
            state: components.state,
            post_code: components.post_code,
            country: components.country,
            icon: component(raw, "icon"),
        }
    }

    /// Identifying fields used for equality and hashing
    fn identity(&self) -> (u64, u64, Option<&str>) {
        (
            coordinate_bits(self.lat),
            coordinate_bits(self.lon),
            self.name.as_deref(),
        )
    }
}

impl PartialEq for MapLocation {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for MapLocation {}

impl Hash for MapLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for MapLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.name.as_deref().or(self.street.as_deref());
        match (label, self.city.as_deref()) {
            (Some(label), Some(city)) => write!(f, "{label}, {city}"),
            (Some(label), None) => write!(f, "{label}"),
            (None, Some(city)) => write!(f, "{city} ({:.5}, {:.5})", self.lat, self.lon),
            (None, None) => write!(f, "{:.5}, {:.5}", self.lat, self.lon),
        }
    }
}

/// Bit pattern of a coordinate with `-0.0` folded into `0.0`
fn coordinate_bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

/// Text of a scalar JSON value, `None` for blanks and non-scalars
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        },
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn component(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(value_text)
}

fn first_component(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| component(map, key))
}

/// Provider category (`category` in jsonv2, `class` in plain json)
fn category(raw: &Map<String, Value>) -> Option<String> {
    first_component(raw, &["category", "class"])
}

fn is_area(raw: &Map<String, Value>) -> bool {
    first_component(raw, &["addresstype", "type"])
        .is_some_and(|kind| AREA_TYPES.contains(&kind.as_str()))
}

fn starts_with_digit(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

/// Display string split on commas, preferring the raw `display_name`
fn display_segments(record: &LocationRecord) -> Vec<String> {
    let display = record
        .raw
        .get("display_name")
        .and_then(Value::as_str)
        .unwrap_or(&record.address);

    display
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Best-effort place name
///
/// An explicit `name` wins, then the structured entry keyed by the category
/// (`address.shop` for a shop). Failing that, the first display segment is
/// taken when the category denotes a named place and the segment is not a
/// house number.
fn extract_name(raw: &Map<String, Value>, segments: &[String]) -> Option<String> {
    if let Some(name) = component(raw, "name") {
        return Some(name);
    }

    let category = category(raw)?;
    if UNNAMED_CATEGORIES.contains(&category.as_str()) {
        return None;
    }

    let from_address = raw
        .get("address")
        .and_then(Value::as_object)
        .and_then(|address| component(address, &category));
    if from_address.is_some() {
        return from_address;
    }

    match segments {
        [first, _, ..] if !starts_with_digit(first) => Some(first.clone()),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct AddressComponents {
    street: Option<String>,
    city: Option<String>,
    county: Option<String>,
    state: Option<String>,
    post_code: Option<String>,
    country: Option<String>,
}

impl AddressComponents {
    fn from_structured(address: &Map<String, Value>) -> Self {
        let road = first_component(address, ROAD_KEYS);
        let street = match (component(address, "house_number"), road) {
            (Some(number), Some(road)) => Some(format!("{number} {road}")),
            (None, road) => road,
            (Some(_), None) => None,
        };

        Self {
            street,
            city: first_component(address, CITY_KEYS),
            county: component(address, "county"),
            state: component(address, "state"),
            post_code: component(address, "postcode"),
            country: component(address, "country"),
        }
    }

    /// Read components off the display segments, right to left
    ///
    /// Unless the result is itself an area, one segment is always left over
    /// for the place or street so that a short display string does not get
    /// consumed entirely by the administrative levels.
    fn from_display(mut segments: Vec<String>, name: Option<&str>, area: bool) -> Self {
        let keep = usize::from(!area);

        let country = pop_if(&mut segments, 0, |_| true);
        let post_code = pop_if(&mut segments, keep, |s| s.chars().any(|c| c.is_ascii_digit()));
        let state = pop_if(&mut segments, keep, |_| true);
        let county = pop_if(&mut segments, keep, |s| {
            COUNTY_SUFFIXES.iter().any(|suffix| s.ends_with(suffix))
        });
        let city = pop_if(&mut segments, keep, |_| true);

        let mut rest = segments.into_iter().peekable();
        if name.is_some() && rest.peek().map(String::as_str) == name {
            rest.next();
        }
        let street = match (rest.next(), rest.next()) {
            (Some(number), Some(road)) if number.chars().all(|c| c.is_ascii_digit()) => {
                Some(format!("{number} {road}"))
            },
            (first, _) => first,
        };

        Self {
            street,
            city,
            county,
            state,
            post_code,
            country,
        }
    }
}

/// Pop the last segment if more than `keep` remain and it satisfies `pred`
fn pop_if(segments: &mut Vec<String>, keep: usize, pred: impl Fn(&str) -> bool) -> Option<String> {
    match segments.last() {
        Some(last) if segments.len() > keep && pred(last) => segments.pop(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn record(address: &str, lat: f64, lon: f64, raw: &Value) -> LocationRecord {
        LocationRecord::new(
            address,
            GeoLocation::new_unchecked(lat, lon),
            raw.as_object().cloned().unwrap_or_default(),
        )
    }

    fn fred_meyer() -> LocationRecord {
        let display = "Fred Meyer, 194th Street Southwest, Lynnwood, Snohomish County, \
                       Washington, 98036, United States";
        record(
            display,
            47.821_992_4,
            -122.295_333_4,
            &json!({
                "place_id": 21_362_466,
                "licence": "Data © OpenStreetMap contributors, ODbL 1.0. https://osm.org/copyright",
                "osm_type": "node",
                "osm_id": 2_409_491_863_u64,
                "boundingbox": ["47.8219424", "47.8220424", "-122.2953834", "-122.2952834"],
                "lat": "47.8219924",
                "lon": "-122.2953334",
                "display_name": display,
                "class": "shop",
                "type": "supermarket",
                "importance": 0.2001,
                "icon": "https://nominatim.openstreetmap.org/ui/mapicons/shopping_supermarket.p.20.png"
            }),
        )
    }

    #[test]
    fn normalizes_display_only_payload() {
        let location = MapLocation::from_geocoder_result(&fred_meyer());

        assert!((location.lat - 47.821_992_4).abs() < f64::EPSILON);
        assert!((location.lon + 122.295_333_4).abs() < f64::EPSILON);
        assert_eq!(location.name.as_deref(), Some("Fred Meyer"));
        assert_eq!(location.kind.as_deref(), Some("supermarket"));
        assert_eq!(location.street.as_deref(), Some("194th Street Southwest"));
        assert_eq!(location.city.as_deref(), Some("Lynnwood"));
        assert_eq!(location.county.as_deref(), Some("Snohomish County"));
        assert_eq!(location.state.as_deref(), Some("Washington"));
        assert_eq!(location.post_code.as_deref(), Some("98036"));
        assert_eq!(location.country.as_deref(), Some("United States"));
        assert!(location.icon.is_some_and(|icon| icon.ends_with(".png")));
    }

    #[test]
    fn normalizes_structured_address() {
        let rec = record(
            "123, 5th Avenue, Norkirk, Kirkland, King County, Washington, 98033, United States",
            47.681_2,
            -122.204_5,
            &json!({
                "category": "place",
                "type": "house",
                "name": "",
                "address": {
                    "house_number": "123",
                    "road": "5th Avenue",
                    "neighbourhood": "Norkirk",
                    "city": "Kirkland",
                    "county": "King County",
                    "state": "Washington",
                    "postcode": "98033",
                    "country": "United States",
                    "country_code": "us"
                }
            }),
        );

        let location = MapLocation::from_geocoder_result(&rec);
        assert_eq!(location.name, None);
        assert_eq!(location.kind.as_deref(), Some("house"));
        assert_eq!(location.street.as_deref(), Some("123 5th Avenue"));
        assert_eq!(location.city.as_deref(), Some("Kirkland"));
        assert_eq!(location.county.as_deref(), Some("King County"));
        assert_eq!(location.state.as_deref(), Some("Washington"));
        assert_eq!(location.post_code.as_deref(), Some("98033"));
        assert_eq!(location.country.as_deref(), Some("United States"));
        assert_eq!(location.icon, None);
    }

    #[test]
    fn structured_name_keyed_by_category() {
        let rec = record(
            "Fred Meyer, Lynnwood",
            47.82,
            -122.29,
            &json!({
                "class": "shop",
                "type": "supermarket",
                "address": { "shop": "Fred Meyer", "town": "Lynnwood" }
            }),
        );

        let location = MapLocation::from_geocoder_result(&rec);
        assert_eq!(location.name.as_deref(), Some("Fred Meyer"));
        assert_eq!(location.city.as_deref(), Some("Lynnwood"));
        assert_eq!(location.state, None);
    }

    #[test]
    fn house_number_is_not_a_name() {
        let rec = record(
            "123, 5th Avenue, Kirkland, King County, Washington, 98033, United States",
            47.68,
            -122.20,
            &json!({ "class": "amenity", "type": "yes" }),
        );

        let location = MapLocation::from_geocoder_result(&rec);
        assert_eq!(location.name, None);
        assert_eq!(location.street.as_deref(), Some("123 5th Avenue"));
        assert_eq!(location.city.as_deref(), Some("Kirkland"));
    }

    #[test]
    fn road_result_has_no_name() {
        let rec = record(
            "5th Avenue, Kirkland, King County, Washington, 98033, United States",
            47.68,
            -122.20,
            &json!({ "class": "highway", "type": "residential" }),
        );

        let location = MapLocation::from_geocoder_result(&rec);
        assert_eq!(location.name, None);
        assert_eq!(location.street.as_deref(), Some("5th Avenue"));
    }

    #[test]
    fn area_result_consumes_all_segments() {
        let rec = record(
            "Kirkland, King County, Washington, United States",
            47.68,
            -122.20,
            &json!({ "class": "boundary", "type": "administrative", "addresstype": "city" }),
        );

        let location = MapLocation::from_geocoder_result(&rec);
        assert_eq!(location.name, None);
        assert_eq!(location.street, None);
        assert_eq!(location.post_code, None);
        assert_eq!(location.city.as_deref(), Some("Kirkland"));
        assert_eq!(location.county.as_deref(), Some("King County"));
        assert_eq!(location.state.as_deref(), Some("Washington"));
        assert_eq!(location.country.as_deref(), Some("United States"));
    }

    #[test]
    fn missing_components_are_absent_not_errors() {
        let rec = record("", 10.0, 20.0, &json!({}));
        let location = MapLocation::from_geocoder_result(&rec);
        assert_eq!(location, MapLocation::new(10.0, 20.0));
        assert_eq!(location.city, None);
        assert_eq!(location.country, None);
        assert_eq!(location.kind, None);
    }

    #[test]
    fn wrongly_typed_components_are_absent() {
        let rec = record(
            "Somewhere",
            10.0,
            20.0,
            &json!({
                "type": ["not", "a", "string"],
                "icon": null,
                "address": { "city": {"nested": true}, "postcode": 98036 }
            }),
        );

        let location = MapLocation::from_geocoder_result(&rec);
        assert_eq!(location.kind, None);
        assert_eq!(location.icon, None);
        assert_eq!(location.city, None);
        assert_eq!(location.post_code.as_deref(), Some("98036"));
    }

    #[test]
    fn display_falls_back_to_record_address() {
        let rec = record(
            "Pike Place Market, Pike Place, Seattle, King County, Washington, 98101, United States",
            47.609,
            -122.342,
            &json!({ "class": "tourism", "type": "attraction" }),
        );

        let location = MapLocation::from_geocoder_result(&rec);
        assert_eq!(location.name.as_deref(), Some("Pike Place Market"));
        assert_eq!(location.city.as_deref(), Some("Seattle"));
        assert_eq!(location.post_code.as_deref(), Some("98101"));
    }

    #[test]
    fn equality_uses_identifying_fields() {
        let full = MapLocation::from_geocoder_result(&fred_meyer());
        let bare = MapLocation {
            name: Some("Fred Meyer".to_string()),
            ..MapLocation::new(47.821_992_4, -122.295_333_4)
        };
        assert_eq!(full, bare);

        let elsewhere = MapLocation {
            name: Some("Fred Meyer".to_string()),
            ..MapLocation::new(47.6, -122.3)
        };
        assert_ne!(full, elsewhere);
        assert_ne!(full, MapLocation::new(47.821_992_4, -122.295_333_4));
    }

    #[test]
    fn negative_zero_equals_zero() {
        assert_eq!(MapLocation::new(-0.0, 0.0), MapLocation::new(0.0, -0.0));

        let mut set = HashSet::new();
        set.insert(MapLocation::new(-0.0, 0.0));
        set.insert(MapLocation::new(0.0, 0.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn set_deduplicates_same_place() {
        let mut set = HashSet::new();
        set.insert(MapLocation::from_geocoder_result(&fred_meyer()));
        set.insert(MapLocation::from_geocoder_result(&fred_meyer()));
        set.insert(MapLocation::new(47.4797, -122.2079));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_formats() {
        let location = MapLocation::from_geocoder_result(&fred_meyer());
        assert_eq!(location.to_string(), "Fred Meyer, Lynnwood");
        assert_eq!(MapLocation::new(47.4797, -122.2079).to_string(), "47.47970, -122.20790");
    }

    #[test]
    fn serializes_kind_as_type() {
        let location = MapLocation::from_geocoder_result(&fred_meyer());
        let json = serde_json::to_value(&location).expect("serialize");
        assert_eq!(json["type"], "supermarket");
        assert_eq!(json["post_code"], "98036");
    }

    proptest! {
        #[test]
        fn normalizer_never_panics(display in "\\PC{0,200}", class in "[a-z]{0,10}") {
            let rec = record(
                &display,
                0.0,
                0.0,
                &json!({ "display_name": display.clone(), "class": class }),
            );
            let location = MapLocation::from_geocoder_result(&rec);
            prop_assert_eq!(location.lat, 0.0);
        }

        #[test]
        fn country_is_last_segment(
            segments in proptest::collection::vec("[A-Za-z ]{1,12}", 1..8)
        ) {
            let display = segments.join(", ");
            let rec = record(&display, 0.0, 0.0, &json!({}));
            let expected = segments
                .iter()
                .map(|s| s.trim())
                .rfind(|s| !s.is_empty())
                .map(str::to_string);
            prop_assert_eq!(MapLocation::from_geocoder_result(&rec).country, expected);
        }
    }
}
