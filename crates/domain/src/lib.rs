//! Domain layer for the navigation API
//!
//! Contains the value objects (points, routes), the geocoder result entities
//! and the normalization rules that turn raw provider payloads into
//! [`MapLocation`]s. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
