//! Routing service configuration

use serde::{Deserialize, Serialize};

use crate::models::RoutingProfile;

/// Configuration for the OSRM routing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Travel mode used for every request
    #[serde(default)]
    pub profile: RoutingProfile,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of alternatives to ask for besides the main route
    #[serde(default = "default_alternatives")]
    pub alternatives: u8,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_alternatives() -> u8 {
    3
}

fn default_user_agent() -> String {
    concat!("navigation-api/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            profile: RoutingProfile::default(),
            timeout_secs: default_timeout_secs(),
            alternatives: default_alternatives(),
            user_agent: default_user_agent(),
        }
    }
}

impl OsrmConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.alternatives > 10 {
            return Err("alternatives must be 10 or less".to_string());
        }

        Ok(())
    }
}
