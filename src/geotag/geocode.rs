// Reverse geocoding boundary
//
// Coordinates resolve to a localized address via a Nominatim-style endpoint.
// The address-to-label reslicing assumes the comma-separated shape Nominatim
// returns today; it lives in one function so a format change stays contained.

use serde::Deserialize;
use std::time::Duration;

use crate::constants::{
    DEFAULT_GEOCODER_LANGUAGE, GEOCODER_ENDPOINT, GEOCODER_TIMEOUT_SECS, GEOCODER_USER_AGENT,
};
use crate::error::{Result, RoadLapseError};

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// Blocking reverse-geocoding client.
pub struct ReverseGeocoder {
    client: reqwest::blocking::Client,
    endpoint: String,
    language: String,
}

impl ReverseGeocoder {
    pub fn new(language: &str) -> Result<Self> {
        Self::with_endpoint(GEOCODER_ENDPOINT, language)
    }

    pub fn with_endpoint(endpoint: &str, language: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(GEOCODER_USER_AGENT)
            .timeout(Duration::from_secs(GEOCODER_TIMEOUT_SECS))
            .build()
            .map_err(|e| RoadLapseError::Geocode(format!("Failed to build client: {}", e)))?;

        let language = if language.is_empty() {
            DEFAULT_GEOCODER_LANGUAGE.to_string()
        } else {
            language.to_string()
        };

        Ok(ReverseGeocoder {
            client,
            endpoint: endpoint.to_string(),
            language,
        })
    }

    /// Resolve `(lat, lon)` to a localized address string, None when the
    /// geocoder has no result for the location.
    pub fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .map_err(|e| RoadLapseError::Geocode(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RoadLapseError::Geocode(format!(
                "geocoder returned {}",
                response.status()
            )));
        }

        let body: ReverseResponse = response
            .json()
            .map_err(|e| RoadLapseError::Geocode(format!("bad response body: {}", e)))?;

        Ok(body.display_name)
    }
}

/// Compress a geocoder address into a short label: strip spaces, split on
/// commas, and with at least 4 components recompose as
/// `"{3rd-from-last} {4th-from-last} {1st}"` (region, city, finest detail).
/// Fewer components means the shape assumption does not hold and the address
/// is treated as unresolved.
pub fn normalize_address(address: &str) -> Option<String> {
    let squeezed = address.replace(' ', "");
    let parts: Vec<&str> = squeezed.split(',').collect();
    if parts.len() < 4 {
        return None;
    }
    Some(format!(
        "{} {} {}",
        parts[parts.len() - 3],
        parts[parts.len() - 4],
        parts[0]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_five_component_address() {
        let label = normalize_address("123Main St,Tokyo,Japan,Shibuya-ku,Tokyo-to").unwrap();
        assert_eq!(label, "Japan Tokyo 123MainSt");
    }

    #[test]
    fn test_normalize_strips_spaces_before_splitting() {
        let label = normalize_address("1 Chome 2, Jinnan, Shibuya, Tokyo, Japan").unwrap();
        assert_eq!(label, "Shibuya Jinnan 1Chome2");
    }

    #[test]
    fn test_normalize_exactly_four_components() {
        let label = normalize_address("a,b,c,d").unwrap();
        // 3rd-from-last = b, 4th-from-last = a, 1st = a
        assert_eq!(label, "b a a");
    }

    #[test]
    fn test_too_few_components_is_unresolved() {
        assert_eq!(normalize_address("a,b,c"), None);
        assert_eq!(normalize_address(""), None);
    }
}
