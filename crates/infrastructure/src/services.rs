//! Wiring of the facades to the HTTP-backed adapters

use std::sync::Arc;

use application::{ApplicationError, GeocodingPort, LocationSearch, NavigationSearch, RoutingPort};
use domain::{GeoLocation, MapLocation};
use tracing::info;

use crate::adapters::{NominatimGeocodingAdapter, OsrmRoutingAdapter};
use crate::config::AppConfig;

/// Shared geocoding and routing backends
///
/// Cheap to clone. Every facade built from the same instance shares the
/// Nominatim rate limiter and result cache.
#[derive(Clone)]
pub struct NavigationServices {
    geocoding: Arc<dyn GeocodingPort>,
    routing: Arc<dyn RoutingPort>,
}

impl std::fmt::Debug for NavigationServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationServices").finish_non_exhaustive()
    }
}

impl NavigationServices {
    /// Use custom port implementations
    pub fn new(geocoding: Arc<dyn GeocodingPort>, routing: Arc<dyn RoutingPort>) -> Self {
        Self { geocoding, routing }
    }

    /// Build Nominatim and OSRM adapters from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if either configuration section is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        let geocoding = NominatimGeocodingAdapter::from_config(&config.nominatim)?;
        let routing = OsrmRoutingAdapter::from_config(&config.osrm)?;

        info!(
            nominatim = %config.nominatim.base_url,
            osrm = %config.osrm.base_url,
            profile = %config.osrm.profile,
            "Navigation services configured"
        );

        Ok(Self::new(Arc::new(geocoding), Arc::new(routing)))
    }

    /// Location search around `anchor`
    pub fn location_search(&self, anchor: GeoLocation) -> LocationSearch {
        LocationSearch::new(anchor, Arc::clone(&self.geocoding))
    }

    /// Navigation between two locations
    pub fn navigation_search(
        &self,
        origin: MapLocation,
        destination: MapLocation,
    ) -> NavigationSearch {
        NavigationSearch::new(origin, destination, Arc::clone(&self.routing))
    }
}
