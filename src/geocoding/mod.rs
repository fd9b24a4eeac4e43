use crate::config::GeocodingConfig;
use crate::error::Error;
use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use std::time::Duration;
use url::Url;

pub mod tiles;

/// Reverse geocoding seam. The production implementation talks to
/// Nominatim; tests substitute their own.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<String>;
}

/// Nominatim-backed reverse geocoder
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("vanet-command/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Geocoding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.nominatim_url.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<String> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("format", "json".to_string()),
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ],
        )
        .map_err(|e| Error::Geocoding(format!("Invalid geocoding URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .header("Accept-Language", "en")
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Reverse lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(
                Error::Geocoding(format!("Geocoding failed: {}", response.status())).into(),
            );
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Malformed geocoding response: {}", e)))?;

        Ok(format_address(&data))
    }
}

/// Build a human-readable address from Nominatim response components,
/// preferring road / suburb / city / state parts over the display name.
fn format_address(data: &serde_json::Value) -> String {
    let address = &data["address"];

    let parts: Vec<&str> = [
        address["road"].as_str(),
        address["suburb"]
            .as_str()
            .or_else(|| address["neighbourhood"].as_str()),
        address["city"]
            .as_str()
            .or_else(|| address["town"].as_str())
            .or_else(|| address["village"].as_str()),
        address["state"].as_str(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !parts.is_empty() {
        return parts.join(", ");
    }

    data["display_name"]
        .as_str()
        .unwrap_or("Unknown Location")
        .to_string()
}

/// Resolve coordinates to an address, degrading to a formatted
/// coordinate pair on any failure. Never returns an error.
pub async fn reverse_or_coords(geocoder: &dyn Geocoder, lat: f64, lng: f64) -> String {
    match geocoder.reverse(lat, lng).await {
        Ok(address) => address,
        Err(e) => {
            warn!("Reverse geocoding failed, falling back to coordinates: {}", e);
            format!("{:.4}, {:.4}", lat, lng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingGeocoder;

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn reverse(&self, _lat: f64, _lng: f64) -> Result<String> {
            Err(Error::Geocoding("connection refused".to_string()).into())
        }
    }

    struct FixedGeocoder(&'static str);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn reverse(&self, _lat: f64, _lng: f64) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn failure_falls_back_to_four_decimal_coordinates() {
        let result = reverse_or_coords(&FailingGeocoder, 40.7128, -74.0060).await;
        assert_eq!(result, "40.7128, -74.0060");
    }

    #[tokio::test]
    async fn success_passes_the_address_through() {
        let result = reverse_or_coords(&FixedGeocoder("Broadway, Manhattan"), 40.7580, -73.9855).await;
        assert_eq!(result, "Broadway, Manhattan");
    }

    #[test]
    fn address_parts_are_joined_in_order() {
        let data = serde_json::json!({
            "address": {
                "road": "Broadway",
                "neighbourhood": "Theater District",
                "city": "New York",
                "state": "New York",
            },
            "display_name": "unused"
        });
        assert_eq!(
            format_address(&data),
            "Broadway, Theater District, New York, New York"
        );
    }

    #[test]
    fn missing_parts_fall_back_to_display_name() {
        let data = serde_json::json!({
            "address": {},
            "display_name": "Somewhere, NY"
        });
        assert_eq!(format_address(&data), "Somewhere, NY");

        let empty = serde_json::json!({});
        assert_eq!(format_address(&empty), "Unknown Location");
    }
}
