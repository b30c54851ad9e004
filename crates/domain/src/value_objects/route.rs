//! Route value object and extremum selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate path between two locations as reported by a routing backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Total length of the path in meters
    pub distance_meters: f64,
    /// Expected travel time in seconds
    pub duration_seconds: f64,
    /// Backend-provided summary (usually the main roads taken)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Route {
    /// Create a route without summary
    #[must_use]
    pub const fn new(distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
            summary: None,
        }
    }

    /// Attach a summary
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Distance in kilometers
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Duration in whole minutes, rounded to nearest
    #[must_use]
    pub fn duration_minutes(&self) -> u64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let minutes = (self.duration_seconds / 60.0).round().max(0.0) as u64;
        minutes
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} km, {} min",
            self.distance_km(),
            self.duration_minutes()
        )?;
        if let Some(summary) = self.summary.as_deref().filter(|s| !s.is_empty()) {
            write!(f, " via {summary}")?;
        }
        Ok(())
    }
}

/// Route with the smallest distance, first one wins on ties
#[must_use]
pub fn shortest(routes: &[Route]) -> Option<&Route> {
    routes
        .iter()
        .min_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters))
}

/// Route with the smallest duration, first one wins on ties
#[must_use]
pub fn fastest(routes: &[Route]) -> Option<&Route> {
    routes
        .iter()
        .min_by(|a, b| a.duration_seconds.total_cmp(&b.duration_seconds))
}
