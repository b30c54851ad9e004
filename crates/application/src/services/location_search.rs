//! Location search service
//!
//! Forward, structured and reverse geocoding anchored at a reference point.
//! Every hit is normalized into a [`MapLocation`].

use std::{collections::HashSet, fmt, sync::Arc};

use domain::{GeoLocation, LocationRecord, MapLocation};
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{AddressQuery, GeocodingPort},
};

/// Location search facade anchored at a point
///
/// The anchor biases free-text searches towards nearby hits and breaks ties
/// between several candidates of a structured search. It never filters
/// results, so the same street in another region stays reachable.
pub struct LocationSearch {
    anchor: GeoLocation,
    geocoding: Arc<dyn GeocodingPort>,
}

impl fmt::Debug for LocationSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationSearch")
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

impl LocationSearch {
    /// Create a new location search around `anchor`
    pub fn new(anchor: GeoLocation, geocoding: Arc<dyn GeocodingPort>) -> Self {
        Self { anchor, geocoding }
    }

    /// The anchor point
    pub const fn anchor(&self) -> GeoLocation {
        self.anchor
    }

    /// Free-text destination search
    ///
    /// Blank queries and queries without matches yield an empty set.
    #[instrument(skip(self), fields(anchor = %self.anchor))]
    pub async fn search_destination(
        &self,
        query: &str,
    ) -> Result<HashSet<MapLocation>, ApplicationError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Blank destination query");
            return Ok(HashSet::new());
        }

        let records = self.geocoding.search(query, &self.anchor).await?;
        if records.is_empty() {
            warn!(query, "No destinations found");
        }

        let results: HashSet<MapLocation> = records
            .iter()
            .map(MapLocation::from_geocoder_result)
            .collect();

        debug!(count = results.len(), "Destinations found");
        Ok(results)
    }

    /// Structured address search
    ///
    /// When the provider returns several candidates the one closest to the
    /// anchor wins; the provider's order decides between equally close ones.
    #[instrument(skip(self), fields(anchor = %self.anchor, address = %query))]
    pub async fn search_address(
        &self,
        query: &AddressQuery,
    ) -> Result<MapLocation, ApplicationError> {
        query.validate()?;

        let records = self.geocoding.search_address(query).await?;
        debug!(candidates = records.len(), "Address candidates");

        let best = self
            .nearest(&records)
            .ok_or_else(|| ApplicationError::NotFound(format!("address '{query}'")))?;

        Ok(MapLocation::from_geocoder_result(best))
    }

    /// Reverse geocoding of a point
    #[instrument(skip(self))]
    pub async fn reverse(&self, point: &GeoLocation) -> Result<MapLocation, ApplicationError> {
        let record = self
            .geocoding
            .reverse(point)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("location at {point}")))?;

        Ok(MapLocation::from_geocoder_result(&record))
    }

    fn nearest<'a>(&self, records: &'a [LocationRecord]) -> Option<&'a LocationRecord> {
        records.iter().min_by(|a, b| {
            self.anchor
                .distance_km(&a.point)
                .total_cmp(&self.anchor.distance_km(&b.point))
        })
    }
}
