//! Geocoding adapter - Implements GeocodingPort using the Nominatim client

use std::fmt;

use application::error::ApplicationError;
use application::ports::{AddressQuery, GeocodingPort};
use async_trait::async_trait;
use domain::{GeoLocation, LocationRecord};
use integration_navigation::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, StructuredAddress,
};
use tracing::{debug, instrument};

/// Adapter for address and place lookup backed by Nominatim
pub struct NominatimGeocodingAdapter {
    client: Box<dyn GeocodingClient>,
}

impl fmt::Debug for NominatimGeocodingAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NominatimGeocodingAdapter")
            .field("client", &"NominatimGeocodingClient")
            .finish()
    }
}

impl NominatimGeocodingAdapter {
    /// Wrap an existing client
    pub fn new(client: impl GeocodingClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Build the adapter and its HTTP client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn from_config(config: &NominatimConfig) -> Result<Self, ApplicationError> {
        config.validate().map_err(|e| {
            ApplicationError::Configuration(format!("Invalid geocoding configuration: {e}"))
        })?;
        let client = NominatimGeocodingClient::new(config).map_err(map_error)?;
        Ok(Self::new(client))
    }
}

fn structured(query: &AddressQuery) -> StructuredAddress {
    StructuredAddress {
        street: query.street.clone(),
        city: query.city.clone(),
        county: query.county.clone(),
        state: query.state.clone(),
        country: query.country.clone(),
    }
}

/// Retryability of the client error carries over to the application error
fn map_error(err: GeocodingError) -> ApplicationError {
    match err {
        GeocodingError::ParseError(msg) => {
            ApplicationError::MalformedResponse(format!("Geocoding response: {msg}"))
        },
        other if other.is_retryable() => ApplicationError::UpstreamFailure(other.to_string()),
        other => ApplicationError::Rejected(other.to_string()),
    }
}

#[async_trait]
impl GeocodingPort for NominatimGeocodingAdapter {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        near: &GeoLocation,
    ) -> Result<Vec<LocationRecord>, ApplicationError> {
        let records = self
            .client
            .search(query, Some(*near))
            .await
            .map_err(map_error)?;
        debug!(count = records.len(), "Geocoding search finished");
        Ok(records)
    }

    #[instrument(skip(self), fields(address = %query))]
    async fn search_address(
        &self,
        query: &AddressQuery,
    ) -> Result<Vec<LocationRecord>, ApplicationError> {
        self.client
            .search_structured(&structured(query))
            .await
            .map_err(map_error)
    }

    #[instrument(skip(self))]
    async fn reverse(
        &self,
        point: &GeoLocation,
    ) -> Result<Option<LocationRecord>, ApplicationError> {
        self.client
            .reverse_geocode(point.latitude(), point.longitude())
            .await
            .map_err(map_error)
    }
}
