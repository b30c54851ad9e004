//! Geographic point value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A point on the globe given as latitude/longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl GeoLocation {
    /// Create a new point with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in [-90, 90],
    /// longitude is not in [-180, 180], or either value is NaN
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a point without validation (for trusted sources and constants)
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another point in kilometers (Haversine)
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lon / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Axis-aligned box of roughly `radius_km` around this point
    ///
    /// Returned as `(min_lon, min_lat, max_lon, max_lat)`, clamped to valid ranges.
    #[must_use]
    pub fn bounding_box(&self, radius_km: f64) -> (f64, f64, f64, f64) {
        const KM_PER_DEGREE_LAT: f64 = 111.32;

        let delta_lat = radius_km / KM_PER_DEGREE_LAT;
        let cos_lat = self.latitude.to_radians().cos().abs().max(0.01);
        let delta_lon = radius_km / (KM_PER_DEGREE_LAT * cos_lat);

        (
            (self.longitude - delta_lon).max(-180.0),
            (self.latitude - delta_lat).max(-90.0),
            (self.longitude + delta_lon).min(180.0),
            (self.latitude + delta_lat).min(90.0),
        )
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let loc = GeoLocation::new(47.6769, -122.206).expect("valid coordinates");
        assert!((loc.latitude() - 47.6769).abs() < f64::EPSILON);
        assert!((loc.longitude() + 122.206).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(GeoLocation::new(90.0, 180.0).is_ok());
        assert!(GeoLocation::new(-90.0, -180.0).is_ok());
        assert!(GeoLocation::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(GeoLocation::new(91.0, 0.0).is_err());
        assert!(GeoLocation::new(0.0, -181.0).is_err());
        assert!(GeoLocation::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_display() {
        let loc = GeoLocation::new(47.8219924, -122.2953334).expect("valid");
        assert_eq!(loc.to_string(), "47.821992, -122.295333");
    }

    #[test]
    fn test_distance_same_point() {
        let loc = GeoLocation::new_unchecked(47.6769, -122.206);
        assert!(loc.distance_km(&loc).abs() < 0.001);
    }

    #[test]
    fn test_distance_kirkland_manhattan() {
        let kirkland = GeoLocation::new_unchecked(47.6769, -122.206);
        let manhattan = GeoLocation::new_unchecked(40.7128, -74.006);
        // Roughly 3,870 km coast to coast
        let distance = kirkland.distance_km(&manhattan);
        assert!((distance - 3870.0).abs() < 60.0);
    }

    #[test]
    fn test_bounding_box_contains_center() {
        let loc = GeoLocation::new_unchecked(47.6769, -122.206);
        let (min_lon, min_lat, max_lon, max_lat) = loc.bounding_box(25.0);
        assert!(min_lon < loc.longitude() && loc.longitude() < max_lon);
        assert!(min_lat < loc.latitude() && loc.latitude() < max_lat);
        // 25km is a bit under a quarter degree of latitude
        assert!((max_lat - min_lat - 0.449).abs() < 0.01);
    }

    #[test]
    fn test_bounding_box_clamped_at_pole() {
        let loc = GeoLocation::new_unchecked(89.9, 0.0);
        let (_, _, _, max_lat) = loc.bounding_box(100.0);
        assert!((max_lat - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serialization() {
        let loc = GeoLocation::new(47.4797, -122.2079).expect("valid");
        let json = serde_json::to_string(&loc).expect("serialize");
        let deserialized: GeoLocation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(loc, deserialized);
    }
}
