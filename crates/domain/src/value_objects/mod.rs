//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
pub mod route;

pub use geo_location::GeoLocation;
pub use route::Route;
