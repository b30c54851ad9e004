//! Raw geocoder result

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value_objects::GeoLocation;

/// A single geocoder hit before normalization
///
/// Keeps the provider's payload untouched so that normalization can pick
/// whatever components the provider happened to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Full human-readable address as returned by the provider
    pub address: String,
    /// Resolved coordinates
    pub point: GeoLocation,
    /// Provider payload as a loosely-typed key/value mapping
    #[serde(default)]
    pub raw: Map<String, Value>,
}

impl LocationRecord {
    /// Create a record
    pub fn new(address: impl Into<String>, point: GeoLocation, raw: Map<String, Value>) -> Self {
        Self {
            address: address.into(),
            point,
            raw,
        }
    }

    /// Look up a top-level string component of the raw payload
    pub fn raw_str(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }
}
