//! Infrastructure layer - Adapters for external systems
//!
//! Implements the geocoding and routing ports with the Nominatim and OSRM
//! clients, loads the layered application configuration and sets up logging.

pub mod adapters;
pub mod config;
pub mod services;
pub mod telemetry;

pub use adapters::*;
pub use config::AppConfig;
pub use services::NavigationServices;
pub use telemetry::{LogFormat, LoggingConfig, LoggingError, init_logging};
