//! Routing service port
//!
//! Defines the interface for fetching route alternatives between two points.

use async_trait::async_trait;
use domain::{GeoLocation, Route};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for routing operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// All route alternatives from `origin` to `destination`, in backend order
    ///
    /// An unreachable pair yields an empty list rather than an error.
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<Vec<Route>, ApplicationError>;
}
