//! Nominatim geocoding client
//!
//! Forward, structured and reverse geocoding through the
//! [Nominatim](https://nominatim.openstreetmap.org) API (OpenStreetMap).
//!
//! Implements rate limiting (max 1 request/second per Nominatim usage policy)
//! and result caching to minimize API calls. Hits are returned as
//! [`LocationRecord`]s that keep the full provider payload.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoLocation, LocationRecord};
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Maximum number of hits per search
    #[serde(default = "default_max_results")]
    pub max_results: u8,

    /// Minimum spacing between two requests in milliseconds
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Half-width of the search bias box around the anchor, in kilometers
    #[serde(default = "default_viewbox_radius_km")]
    pub viewbox_radius_km: f64,

    /// Value of the `accept-language` parameter
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Optional ISO country code filter (e.g. "us"), empty for worldwide
    #[serde(default)]
    pub country_filter: String,

    /// User agent sent with every request (required by the usage policy)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    5
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

const fn default_max_results() -> u8 {
    10
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

const fn default_viewbox_radius_km() -> f64 {
    50.0
}

fn default_accept_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    concat!("navigation-api/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_geocoding_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            max_results: default_max_results(),
            min_request_interval_ms: default_min_request_interval_ms(),
            viewbox_radius_km: default_viewbox_radius_km(),
            accept_language: default_accept_language(),
            country_filter: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_hours: 0,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_hours > 0
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

        if self.max_results == 0 || self.max_results > 50 {
            return Err("max_results must be between 1 and 50".to_string());
        }

        if self.viewbox_radius_km.is_nan() || self.viewbox_radius_km <= 0.0 {
            return Err("viewbox_radius_km must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        Ok(())
    }
}

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// The query cannot be sent as is
    #[error("Invalid geocoding query: {0}")]
    InvalidQuery(String),

    /// Rate limit exceeded (max 1 req/sec for Nominatim)
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

impl GeocodingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::RateLimitExceeded | Self::Timeout
        )
    }
}

/// A structured address lookup as understood by Nominatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredAddress {
    pub street: String,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl StructuredAddress {
    /// Query parameters for the non-blank components
    fn params(&self) -> Vec<(&'static str, String)> {
        [
            ("street", Some(self.street.as_str())),
            ("city", self.city.as_deref()),
            ("county", self.county.as_deref()),
            ("state", self.state.as_deref()),
            ("country", self.country.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }
}

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Free-text search, optionally biased towards a point
    async fn search(
        &self,
        query: &str,
        near: Option<GeoLocation>,
    ) -> Result<Vec<LocationRecord>, GeocodingError>;

    /// Structured address search
    async fn search_structured(
        &self,
        address: &StructuredAddress,
    ) -> Result<Vec<LocationRecord>, GeocodingError>;

    /// Convert coordinates to the closest known place
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<LocationRecord>, GeocodingError>;
}

/// Nominatim-based geocoding client with rate limiting and caching
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<Cache<String, Vec<LocationRecord>>>,
    last_request: Arc<Mutex<Instant>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(config.cache_ttl_hours * 3600))
                .build()
        });

        let interval = Duration::from_millis(config.min_request_interval_ms);
        let start = Instant::now().checked_sub(interval).unwrap_or_else(Instant::now);

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            last_request: Arc::new(Mutex::new(start)),
        })
    }

    /// Enforce Nominatim's rate limit
    async fn rate_limit(&self) {
        let interval = Duration::from_millis(self.config.min_request_interval_ms);
        if interval.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < interval {
            let wait = interval.saturating_sub(elapsed);
            debug!(?wait, "Rate limiting geocoding request");
            tokio::time::sleep(wait).await;
        }
        *last = Instant::now();
    }

    fn base_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
            ("accept-language", self.config.accept_language.clone()),
        ]
    }

    /// Issue a GET against `endpoint`, going through cache and rate limiter
    async fn fetch(
        &self,
        endpoint: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<Vec<LocationRecord>, GeocodingError> {
        let cache_key = cache_key(endpoint, &params);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&cache_key).await {
                debug!(%cache_key, "Geocoding cache hit");
                return Ok(hit);
            }
        }

        self.rate_limit().await;

        let url = format!("{}/{endpoint}", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if status.is_client_error() {
            return Err(GeocodingError::InvalidQuery(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;
        let records = parse_response(body)?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, records.clone()).await;
        }
        Ok(records)
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        near: Option<GeoLocation>,
    ) -> Result<Vec<LocationRecord>, GeocodingError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodingError::InvalidQuery(
                "Query must not be empty".to_string(),
            ));
        }

        let mut params = self.base_params();
        params.push(("q", query.to_string()));
        params.push(("limit", self.config.max_results.to_string()));

        if let Some(anchor) = near {
            let (min_lon, min_lat, max_lon, max_lat) =
                anchor.bounding_box(self.config.viewbox_radius_km);
            params.push(("viewbox", format!("{min_lon},{min_lat},{max_lon},{max_lat}")));
            params.push(("bounded", "0".to_string()));
        }

        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        debug!(%query, "Searching places");
        let records = self.fetch("search", params).await?;
        if records.is_empty() {
            warn!(%query, "No places found");
        }
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn search_structured(
        &self,
        address: &StructuredAddress,
    ) -> Result<Vec<LocationRecord>, GeocodingError> {
        if address.street.trim().is_empty() {
            return Err(GeocodingError::InvalidQuery(
                "Street must not be empty".to_string(),
            ));
        }

        let mut params = self.base_params();
        params.extend(address.params());
        params.push(("limit", self.config.max_results.to_string()));

        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        debug!(street = %address.street, "Searching structured address");
        self.fetch("search", params).await
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<LocationRecord>, GeocodingError> {
        let mut params = self.base_params();
        params.push(("lat", latitude.to_string()));
        params.push(("lon", longitude.to_string()));

        debug!(%latitude, %longitude, "Reverse geocoding");
        let records = self.fetch("reverse", params).await?;
        Ok(records.into_iter().next())
    }
}

/// Stable cache key for an endpoint and its parameters
fn cache_key(endpoint: &str, params: &[(&'static str, String)]) -> String {
    let mut key = endpoint.to_string();
    for (name, value) in params {
        key.push('|');
        key.push_str(name);
        key.push('=');
        key.push_str(&value.to_lowercase());
    }
    key
}

/// Turn a Nominatim body into records
///
/// `/search` answers with an array, `/reverse` with a single object or with
/// `{"error": ...}` when nothing is there.
fn parse_response(body: Value) -> Result<Vec<LocationRecord>, GeocodingError> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(raw) => record_from_raw(raw),
                other => Err(GeocodingError::ParseError(format!(
                    "expected object in result list, got {other}"
                ))),
            })
            .collect(),
        Value::Object(raw) if raw.contains_key("error") => Ok(Vec::new()),
        Value::Object(raw) => record_from_raw(raw).map(|record| vec![record]),
        other => Err(GeocodingError::ParseError(format!(
            "unexpected response shape: {other}"
        ))),
    }
}

fn record_from_raw(raw: Map<String, Value>) -> Result<LocationRecord, GeocodingError> {
    let latitude = coordinate(&raw, "lat")?;
    let longitude = coordinate(&raw, "lon")?;
    let point = GeoLocation::new(latitude, longitude)
        .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

    let address = raw
        .get("display_name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(LocationRecord::new(address, point, raw))
}

/// Nominatim sends coordinates as strings, tolerate numbers too
fn coordinate(raw: &Map<String, Value>, key: &str) -> Result<f64, GeocodingError> {
    let value = raw
        .get(key)
        .ok_or_else(|| GeocodingError::ParseError(format!("missing {key}")))?;

    match value {
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("invalid {key}: {s}"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| GeocodingError::ParseError(format!("invalid {key}: {n}"))),
        other => Err(GeocodingError::ParseError(format!("invalid {key}: {other}"))),
    }
}
