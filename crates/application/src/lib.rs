//! Application layer - Use cases and orchestration
//!
//! Contains the location search and navigation facades plus the ports they
//! talk to. Adapters in the infrastructure layer plug real geocoding and
//! routing services into these ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
