//! Logging initialization
//!
//! Console logging through `tracing-subscriber`, either human-readable or JSON.

mod logging;

pub use logging::{LogFormat, LoggingConfig, LoggingError, init_logging};
