//! Geocoding service port
//!
//! Defines the interface for forward, structured and reverse geocoding.
//! Adapters in the infrastructure layer implement this port using a
//! geocoding API and hand back raw [`LocationRecord`]s for normalization.

use std::fmt;

use async_trait::async_trait;
use domain::{DomainError, GeoLocation, LocationRecord};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A structured address lookup
///
/// Only the street is required. Each further component narrows the search;
/// omitted components leave the provider free to match any region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    /// House number and street, e.g. `123 5th Ave`
    pub street: String,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl AddressQuery {
    /// Create a query for a street
    #[must_use]
    pub fn new(street: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            ..Self::default()
        }
    }

    /// Set the city
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the county
    #[must_use]
    pub fn with_county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    /// Set the state
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Non-blank components from most to least specific
    pub fn components(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.street.as_str())
            .chain(self.city.as_deref())
            .chain(self.county.as_deref())
            .chain(self.state.as_deref())
            .chain(self.country.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Reject queries without a street
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.street.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "street must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for AddressQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components().collect::<Vec<_>>().join(", "))
    }
}

/// Port for geocoding operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Free-text place or address search, biased towards `near`
    ///
    /// Returns an empty list when nothing matches.
    async fn search(
        &self,
        query: &str,
        near: &GeoLocation,
    ) -> Result<Vec<LocationRecord>, ApplicationError>;

    /// Structured address search
    ///
    /// Returns every candidate the provider considers a match, best first.
    async fn search_address(
        &self,
        query: &AddressQuery,
    ) -> Result<Vec<LocationRecord>, ApplicationError>;

    /// Reverse geocoding of a point, `None` if nothing is there
    async fn reverse(
        &self,
        point: &GeoLocation,
    ) -> Result<Option<LocationRecord>, ApplicationError>;
}
