//! OSRM routing client
//!
//! Fetches road route alternatives from an [OSRM](https://project-osrm.org)
//! server through its `route` service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::OsrmConfig;
use crate::error::NavigationError;
use crate::models::RouteCandidate;

/// Trait for routing service clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// All route alternatives between two coordinate pairs, main route first
    ///
    /// An unroutable pair yields an empty list.
    async fn route_alternatives(
        &self,
        from_lat: f64,
        from_lon: f64,
        to_lat: f64,
        to_lon: f64,
    ) -> Result<Vec<RouteCandidate>, NavigationError>;

    /// Check if the routing service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Routing client for the OSRM HTTP API
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM routing client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, NavigationError> {
        config
            .validate()
            .map_err(NavigationError::InvalidConfig)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| NavigationError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn route_url(&self, from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> String {
        // OSRM takes lon,lat pairs
        format!(
            "{}/route/v1/{}/{from_lon},{from_lat};{to_lon},{to_lat}",
            self.config.base_url, self.config.profile
        )
    }

    fn alternatives_param(&self) -> String {
        match self.config.alternatives {
            0 => "false".to_string(),
            n => n.to_string(),
        }
    }

    /// Interpret an OSRM route response
    ///
    /// OSRM reports unroutable pairs with HTTP 400 and a `NoRoute` or
    /// `NoSegment` code, those become an empty list.
    fn parse_route_response(
        status: StatusCode,
        body: &str,
    ) -> Result<Vec<RouteCandidate>, NavigationError> {
        let raw: RawRouteResponse = match serde_json::from_str(body) {
            Ok(raw) => raw,
            Err(_) if status.is_server_error() => {
                return Err(NavigationError::ServiceUnavailable(format!("HTTP {status}")));
            },
            Err(_) if !status.is_success() => {
                return Err(NavigationError::Http {
                    status: status.as_u16(),
                });
            },
            Err(e) => return Err(NavigationError::ParseError(e.to_string())),
        };

        let detail = || {
            raw.message
                .clone()
                .unwrap_or_else(|| format!("HTTP {status}"))
        };

        match raw.code.as_str() {
            "Ok" if status.is_success() => {
                Ok(raw.routes.into_iter().map(Self::convert_route).collect())
            },
            "NoRoute" | "NoSegment" => Ok(Vec::new()),
            _ if status.is_server_error() => Err(NavigationError::ServiceUnavailable(detail())),
            code => Err(NavigationError::Rejected {
                code: code.to_string(),
                message: detail(),
            }),
        }
    }

    fn convert_route(raw: RawRoute) -> RouteCandidate {
        let summary = raw
            .legs
            .iter()
            .filter_map(|leg| leg.summary.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; ");

        RouteCandidate {
            distance_meters: raw.distance,
            duration_seconds: raw.duration,
            summary: (!summary.is_empty()).then_some(summary),
        }
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self), fields(from = %format!("{from_lat},{from_lon}"), to = %format!("{to_lat},{to_lon}")))]
    async fn route_alternatives(
        &self,
        from_lat: f64,
        from_lon: f64,
        to_lat: f64,
        to_lon: f64,
    ) -> Result<Vec<RouteCandidate>, NavigationError> {
        let url = self.route_url(from_lat, from_lon, to_lat, to_lon);

        let params = [
            ("alternatives", self.alternatives_param()),
            ("overview", "false".to_string()),
            ("steps", "false".to_string()),
        ];

        debug!(?url, "Requesting routes");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NavigationError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    NavigationError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NavigationError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| NavigationError::ParseError(e.to_string()))?;

        let routes = Self::parse_route_response(status, &body)?;

        if routes.is_empty() {
            warn!("No route between the given points");
        }

        debug!(count = routes.len(), "Routes found");
        Ok(routes)
    }

    async fn is_healthy(&self) -> bool {
        // A bare route request to a fixed point answers quickly on any OSRM build
        let url = self.route_url(0.0, 0.0, 0.0, 0.0);
        match self.client.get(&url).send().await {
            Ok(response) => !response.status().is_server_error(),
            Err(e) => {
                warn!(error = %e, "Routing health check failed");
                false
            },
        }
    }
}

// ── Raw OSRM JSON response types ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    summary: Option<String>,
}
