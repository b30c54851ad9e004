//! Geocoding and road routing integration
//!
//! Provides address and place lookup via
//! [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org) and route
//! alternatives via an [OSRM](https://project-osrm.org) routing server.
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern consistent with other integration crates.
//! [`RoutingClient`] defines the interface for route lookups, implemented by
//! [`OsrmRoutingClient`]. [`GeocodingClient`] handles forward, structured and reverse
//! geocoding via [`NominatimGeocodingClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_navigation::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//!
//! let routes = client.route_alternatives(
//!     47.6782, -122.2073, // Kirkland
//!     47.4797, -122.2079, // Renton
//! ).await?;
//! ```

mod client;
mod config;
mod error;
mod geocoding;
mod models;

pub use client::{OsrmRoutingClient, RoutingClient};
pub use config::OsrmConfig;
pub use error::NavigationError;
pub use geocoding::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, StructuredAddress,
};
pub use models::{RouteCandidate, RoutingProfile};
