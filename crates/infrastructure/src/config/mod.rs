//! Application configuration
//!
//! Settings are layered: built-in defaults, an optional `config.toml` in the
//! working directory, then `NAVAPI_`-prefixed environment variables with `__`
//! separating nested keys (e.g. `NAVAPI_OSRM__PROFILE=walking`).

use std::path::Path;

use integration_navigation::{NominatimConfig, OsrmConfig};
use serde::{Deserialize, Serialize};

use crate::telemetry::LoggingConfig;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "NAVAPI";

/// Separator between nested keys in environment variable names
pub const ENV_SEPARATOR: &str = "__";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding service configuration
    #[serde(default)]
    pub nominatim: NominatimConfig,

    /// Routing service configuration
    #[serde(default)]
    pub osrm: OsrmConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file, still honoring environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path.as_ref()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with the section name.
    pub fn validate(&self) -> Result<(), String> {
        self.nominatim
            .validate()
            .map_err(|e| format!("nominatim: {e}"))?;
        self.osrm.validate().map_err(|e| format!("osrm: {e}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use integration_navigation::RoutingProfile;

    use super::*;
    use crate::telemetry::LogFormat;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.osrm.profile, RoutingProfile::Driving);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[nominatim]
base_url = "http://localhost:8080"
max_results = 5

[osrm]
profile = "cycling"
alternatives = 1

[logging]
filter = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.nominatim.base_url, "http://localhost:8080");
        assert_eq!(config.nominatim.max_results, 5);
        assert_eq!(config.nominatim.cache_ttl_hours, 24);
        assert_eq!(config.osrm.profile, RoutingProfile::Cycling);
        assert_eq!(config.osrm.alternatives, 1);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn validate_names_the_section() {
        let mut config = AppConfig::default();
        config.osrm.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("osrm:"));
    }
}
