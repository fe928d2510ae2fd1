//! Geographic location value type.

use serde::{Deserialize, Serialize};

/// A geographic location encoded as latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "lat")]
    latitude: f64,
    #[serde(rename = "long")]
    longitude: f64,
}

impl Location {
    /// Create a new location.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The latitude.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// The longitude.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The `lat,long` form used in query strings.
    pub fn query_string_formatted(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}
