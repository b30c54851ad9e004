//! Routing adapter - Implements RoutingPort using the OSRM client

use std::fmt;

use application::error::ApplicationError;
use application::ports::RoutingPort;
use async_trait::async_trait;
use domain::{GeoLocation, Route};
use integration_navigation::{
    NavigationError, OsrmConfig, OsrmRoutingClient, RouteCandidate, RoutingClient,
};
use tracing::instrument;

/// Adapter for road routing backed by OSRM
pub struct OsrmRoutingAdapter {
    client: Box<dyn RoutingClient>,
}

impl fmt::Debug for OsrmRoutingAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsrmRoutingAdapter")
            .field("client", &"OsrmRoutingClient")
            .finish()
    }
}

impl OsrmRoutingAdapter {
    /// Wrap an existing client
    pub fn new(client: impl RoutingClient + 'static) -> Self {
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
    pub fn from_config(config: &OsrmConfig) -> Result<Self, ApplicationError> {
        let client = OsrmRoutingClient::new(config).map_err(map_error)?;
        Ok(Self::new(client))
    }

    /// Check if the routing backend is reachable
    pub async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}

fn map_error(err: NavigationError) -> ApplicationError {
    match err {
        NavigationError::ParseError(msg) => {
            ApplicationError::MalformedResponse(format!("Routing response: {msg}"))
        },
        NavigationError::InvalidConfig(msg) => {
            ApplicationError::Configuration(format!("Invalid routing configuration: {msg}"))
        },
        other if other.is_retryable() => ApplicationError::UpstreamFailure(other.to_string()),
        other => ApplicationError::Rejected(other.to_string()),
    }
}

fn to_route(candidate: RouteCandidate) -> Route {
    let route = Route::new(candidate.distance_meters, candidate.duration_seconds);
    match candidate.summary {
        Some(summary) => route.with_summary(summary),
        None => route,
    }
}

#[async_trait]
impl RoutingPort for OsrmRoutingAdapter {
    #[instrument(skip(self), fields(origin = %origin, destination = %destination))]
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<Vec<Route>, ApplicationError> {
        let candidates = self
            .client
            .route_alternatives(
                origin.latitude(),
                origin.longitude(),
                destination.latitude(),
                destination.longitude(),
            )
            .await
            .map_err(map_error)?;

        Ok(candidates.into_iter().map(to_route).collect())
    }
}
