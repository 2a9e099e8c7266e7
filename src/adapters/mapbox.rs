use crate::adapters::provider::{GeocoderSettings, RESULT_LIMIT};
use crate::domain::model::Coordinates;
use crate::domain::ports::Geocoder;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: PointGeometry,
    #[serde(default)]
    place_name: Option<String>,
}

/// GeoJSON 順序為 [經度, 緯度]
#[derive(Debug, Deserialize)]
struct PointGeometry {
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Mapbox Geocoding v5 (`mapbox.places`) client
pub struct MapboxGeocoder {
    client: Client,
    settings: GeocoderSettings,
}

impl MapboxGeocoder {
    pub fn new(settings: GeocoderSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    /// 地址是路徑的最後一段：`{endpoint}/{address}.json`
    fn places_url(&self, address: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.settings.endpoint).map_err(|e| EtlError::InvalidConfigValueError {
                field: "api_endpoint".to_string(),
                value: self.settings.endpoint.clone(),
                reason: format!("Invalid URL format: {}", e),
            })?;

        url.path_segments_mut()
            .map_err(|_| EtlError::InvalidConfigValueError {
                field: "api_endpoint".to_string(),
                value: self.settings.endpoint.clone(),
                reason: "URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .push(&format!("{}.json", address));

        Ok(url)
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn forward(&self, address: &str) -> Result<Option<Coordinates>> {
        let limit = RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(self.places_url(address)?)
            .query(&[
                ("access_token", self.settings.api_key.expose()),
                ("language", self.settings.language.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("📦 Geocoding response (HTTP {}): {}", status.as_u16(), body);

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(EtlError::ApiStatusError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: PlacesResponse = serde_json::from_str(&body)?;

        Ok(parsed.features.into_iter().next().map(|feature| {
            if let Some(place_name) = &feature.place_name {
                tracing::debug!("Matched: {}", place_name);
            }
            let [longitude, latitude] = feature.geometry.coordinates;
            Coordinates {
                latitude,
                longitude,
            }
        }))
    }
}
