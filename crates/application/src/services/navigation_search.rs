//! Navigation service
//!
//! Fetches route alternatives between two map locations and selects the
//! shortest or fastest one.

use std::{fmt, sync::Arc};

use domain::{MapLocation, Route, route};
use tracing::{debug, instrument, warn};

use crate::{error::ApplicationError, ports::RoutingPort};

/// Navigation facade for a fixed origin/destination pair
///
/// Every call queries the routing backend afresh; nothing is memoized.
pub struct NavigationSearch {
    origin: MapLocation,
    destination: MapLocation,
    routing: Arc<dyn RoutingPort>,
}

impl fmt::Debug for NavigationSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationSearch")
            .field("origin", &self.origin)
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

impl NavigationSearch {
    /// Create a navigation search between two locations
    pub fn new(
        origin: MapLocation,
        destination: MapLocation,
        routing: Arc<dyn RoutingPort>,
    ) -> Self {
        Self {
            origin,
            destination,
            routing,
        }
    }

    /// Where routes start
    pub const fn origin(&self) -> &MapLocation {
        &self.origin
    }

    /// Where routes end
    pub const fn destination(&self) -> &MapLocation {
        &self.destination
    }

    /// All route alternatives, in backend order
    ///
    /// Unreachable pairs yield an empty list.
    #[instrument(skip(self), fields(origin = %self.origin, destination = %self.destination))]
    pub async fn get_routes(&self) -> Result<Vec<Route>, ApplicationError> {
        let routes = self
            .routing
            .route(&self.origin.point(), &self.destination.point())
            .await?;

        if routes.is_empty() {
            warn!("No routes between origin and destination");
        }
        debug!(count = routes.len(), "Routes found");
        Ok(routes)
    }

    /// The route with the smallest distance
    pub async fn get_shortest_route(&self) -> Result<Route, ApplicationError> {
        let routes = self.get_routes().await?;
        route::shortest(&routes)
            .cloned()
            .ok_or_else(|| self.no_route())
    }

    /// The route with the smallest duration
    pub async fn get_fastest_route(&self) -> Result<Route, ApplicationError> {
        let routes = self.get_routes().await?;
        route::fastest(&routes)
            .cloned()
            .ok_or_else(|| self.no_route())
    }

    fn no_route(&self) -> ApplicationError {
        ApplicationError::NotFound(format!(
            "route from {} to {}",
            self.origin.point(),
            self.destination.point()
        ))
    }
}
