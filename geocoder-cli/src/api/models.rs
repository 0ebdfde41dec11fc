//! Geocoding API response models

use serde::Deserialize;

/// Status value the provider sends on success
pub const STATUS_OK: &str = "OK";

/// Top-level geocoding response.
///
/// `results` is kept as raw JSON: its shape is only checked once `status`
/// says `OK`, so a malformed result on a failed lookup is never an error.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A single geocoding result
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A resolved coordinate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LatLng> for Coordinates {
    fn from(location: LatLng) -> Self {
        Self {
            latitude: location.lat,
            longitude: location.lng,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}
