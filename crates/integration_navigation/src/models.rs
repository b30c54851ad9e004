//! Routing data models

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Travel mode understood by OSRM
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl RoutingProfile {
    /// Path segment used in OSRM request URLs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Driving),
            "walking" | "foot" => Ok(Self::Walking),
            "cycling" | "bike" => Ok(Self::Cycling),
            other => Err(format!("unknown routing profile: {other}")),
        }
    }
}

/// One route alternative as reported by the routing server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    /// Total length in meters
    pub distance_meters: f64,
    /// Expected travel time in seconds
    pub duration_seconds: f64,
    /// Names of the main roads, if the server supplied them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
