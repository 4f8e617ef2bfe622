//! Maps web API adapter: key validation and embed/static URL builders.
//!
//! The API key is configuration. It is read from the environment and never
//! compiled in.

use std::env;
use std::fmt;

use serde::Deserialize;

pub const API_KEY_ENV: &str = "SIMHASTHA_MAPS_API_KEY";
pub const API_BASE_URL_ENV: &str = "SIMHASTHA_MAPS_BASE_URL";

#[derive(Debug, Clone)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    /// Base of the JSON web services (geocoding).
    pub api_base_url: String,
    /// Base of the browser-facing map pages and embeds.
    pub web_base_url: String,
    pub timeout_secs: u64,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://maps.googleapis.com".to_string(),
            web_base_url: "https://www.google.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl MapsConfig {
    /// Defaults overridden by `SIMHASTHA_MAPS_API_KEY` and
    /// `SIMHASTHA_MAPS_BASE_URL`. Empty values count as unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.api_key = Some(key.trim().to_string());
            }
        }
        if let Ok(base) = env::var(API_BASE_URL_ENV) {
            if !base.trim().is_empty() {
                config.api_base_url = base.trim().trim_end_matches('/').to_string();
            }
        }
        config
    }
}

/// Outcome of checking the configured key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    Valid,
    MissingKey,
    Invalid,
    QuotaExceeded,
    Other(String),
    NetworkError,
}

impl KeyStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, KeyStatus::Valid)
    }

    /// Text for the map error state, `None` when the key is usable.
    pub fn message(&self) -> Option<String> {
        match self {
            KeyStatus::Valid => None,
            KeyStatus::MissingKey => Some("No maps API key configured".to_string()),
            KeyStatus::Invalid => Some("API key is invalid or restricted".to_string()),
            KeyStatus::QuotaExceeded => Some("API quota exceeded".to_string()),
            KeyStatus::Other(status) => Some(format!("API Error: {}", status)),
            KeyStatus::NetworkError => Some("Network error - check internet connection".to_string()),
        }
    }

    fn from_api_status(status: &str) -> Self {
        match status {
            "OK" => KeyStatus::Valid,
            "REQUEST_DENIED" => KeyStatus::Invalid,
            "OVER_QUERY_LIMIT" => KeyStatus::QuotaExceeded,
            other => KeyStatus::Other(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub enum MapsApiError {
    Http(reqwest::Error),
}

impl From<reqwest::Error> for MapsApiError {
    fn from(err: reqwest::Error) -> Self {
        MapsApiError::Http(err)
    }
}

impl fmt::Display for MapsApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapsApiError::Http(err) => write!(f, "maps API request failed: {}", err),
        }
    }
}

impl std::error::Error for MapsApiError {}

#[derive(Debug, Clone)]
pub struct MapsClient {
    config: MapsConfig,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
}

impl MapsClient {
    pub fn new(config: MapsConfig) -> Result<Self, MapsApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &MapsConfig {
        &self.config
    }

    /// Check the key with a single geocoding request for Ujjain.
    pub fn validate_key(&self) -> KeyStatus {
        let Some(key) = self.config.api_key.as_deref() else {
            return KeyStatus::MissingKey;
        };

        let url = format!("{}/maps/api/geocode/json", self.config.api_base_url);
        let response = self
            .client
            .get(url)
            .query(&[("address", "Ujjain"), ("key", key)])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<GeocodeResponse>());

        let status = match response {
            Ok(body) => KeyStatus::from_api_status(&body.status),
            Err(err) => {
                tracing::warn!(error = %err, "maps key validation request failed");
                KeyStatus::NetworkError
            }
        };
        tracing::info!(?status, "maps API key checked");
        status
    }

    /// Walking directions embed. Falls back to the keyless embed unless the
    /// key has been validated.
    pub fn directions_url(&self, origin: (f64, f64), destination: (f64, f64), status: &KeyStatus) -> String {
        match (status, self.config.api_key.as_deref()) {
            (KeyStatus::Valid, Some(key)) => format!(
                "{}/maps/embed/v1/directions?key={}&origin={},{}&destination={},{}&mode=walking&zoom=15",
                self.config.web_base_url, key, origin.0, origin.1, destination.0, destination.1
            ),
            _ => format!(
                "{}/maps?saddr={},{}&daddr={},{}&dirflg=w&output=embed&z=15",
                self.config.web_base_url, origin.0, origin.1, destination.0, destination.1
            ),
        }
    }

    /// Static map image URL; the first marker is blue, the rest red. Needs a
    /// validated key.
    pub fn static_map_url(&self, center: (f64, f64), markers: &[(f64, f64)], status: &KeyStatus) -> Option<String> {
        let key = self.config.api_key.as_deref()?;
        if !status.is_valid() {
            return None;
        }

        let mut url = format!(
            "{}/maps/api/staticmap?center={},{}&zoom=14&size=600x400",
            self.config.api_base_url, center.0, center.1
        );
        for (index, (lat, lng)) in markers.iter().enumerate() {
            let color = if index == 0 { "blue" } else { "red" };
            url.push_str(&format!("&markers=color:{}%7C{},{}", color, lat, lng));
        }
        url.push_str(&format!("&key={}", key));
        Some(url)
    }
}
