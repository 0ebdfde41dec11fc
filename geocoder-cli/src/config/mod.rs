//! Environment-sourced configuration
//!
//! Values come from the process environment, after an optional `.env` file
//! has been loaded by `main`.

use crate::api::DEFAULT_GEOCODE_URL;

/// Shared secret checked by the access gate
pub const SECRET_VAR: &str = "GEOCODER_SECRET";
/// Google Maps API key used for geocoding calls
pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
/// Optional override of the geocoding endpoint
pub const API_URL_VAR: &str = "GEOCODER_API_URL";

/// Used when `GEOCODER_SECRET` is not set
pub const DEFAULT_SECRET: &str = "default_secret_2024";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Reference value for the access gate
    pub access_secret: String,
    /// Geocoding API key; processing refuses to start without it
    pub api_key: Option<String>,
    /// Geocoding endpoint
    pub api_url: String,
}

/// Configuration problem that blocks an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingApiKey,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(
                f,
                "Google Maps API key not configured. Please set {} environment variable.",
                API_KEY_VAR
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GeocoderConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret = lookup(SECRET_VAR).unwrap_or_else(|| DEFAULT_SECRET.to_string());

        // An empty key is as good as no key
        let api_key = lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty());

        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEOCODE_URL.to_string());

        if access_secret == DEFAULT_SECRET {
            log::warn!("{} not set, using the built-in default secret", SECRET_VAR);
        }
        log::debug!(
            "Geocoding endpoint: {} (API key {})",
            api_url,
            if api_key.is_some() { "set" } else { "missing" }
        );

        Self {
            access_secret,
            api_key,
            api_url,
        }
    }

    /// API key, or the configuration error that blocks processing
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> GeocoderConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GeocoderConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);

        assert_eq!(config.access_secret, DEFAULT_SECRET);
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_url, DEFAULT_GEOCODE_URL);
        assert_eq!(config.require_api_key(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn test_values_from_environment() {
        let config = config_with(&[
            (SECRET_VAR, "s3cret"),
            (API_KEY_VAR, "abc123"),
            (API_URL_VAR, "http://localhost:9999/geocode"),
        ]);

        assert_eq!(config.access_secret, "s3cret");
        assert_eq!(config.require_api_key(), Ok("abc123"));
        assert_eq!(config.api_url, "http://localhost:9999/geocode");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = config_with(&[(API_KEY_VAR, "  ")]);
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_missing_key_message_names_variable() {
        assert!(ConfigError::MissingApiKey.to_string().contains(API_KEY_VAR));
    }
}
