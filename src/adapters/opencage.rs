use crate::adapters::provider::{GeocoderSettings, RESULT_LIMIT};
use crate::domain::model::Coordinates;
use crate::domain::ports::Geocoder;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://api.opencagedata.com/geocode/v1/json";

#[derive(Debug, Deserialize)]
struct ForwardResponse {
    results: Vec<ForwardMatch>,
    #[serde(default)]
    rate: Option<RateInfo>,
}

#[derive(Debug, Deserialize)]
struct ForwardMatch {
    geometry: Geometry,
    #[serde(default)]
    formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RateInfo {
    limit: u64,
    remaining: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status: ResponseStatus,
}

#[derive(Debug, Deserialize)]
struct ResponseStatus {
    message: String,
}

/// OpenCage forward geocoding client
pub struct OpenCageGeocoder {
    client: Client,
    settings: GeocoderSettings,
}

impl OpenCageGeocoder {
    pub fn new(settings: GeocoderSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn forward(&self, address: &str) -> Result<Option<Coordinates>> {
        let limit = RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(&self.settings.endpoint)
            .query(&[
                ("q", address),
                ("key", self.settings.api_key.expose()),
                ("language", self.settings.language.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("📦 Geocoding response (HTTP {}): {}", status.as_u16(), body);

        if !status.is_success() {
            // 服務端的錯誤說明放在 status.message
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.status.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(EtlError::ApiStatusError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ForwardResponse = serde_json::from_str(&body)?;

        if let Some(rate) = &parsed.rate {
            tracing::debug!("Rate limit: {}/{} requests remaining", rate.remaining, rate.limit);
        }

        Ok(parsed.results.into_iter().next().map(|m| {
            if let Some(formatted) = &m.formatted {
                tracing::debug!("Matched: {}", formatted);
            }
            Coordinates {
                latitude: m.geometry.lat,
                longitude: m.geometry.lng,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::provider::Provider;
    use crate::config::ApiKey;
    use httpmock::prelude::*;

    fn geocoder_for(server: &MockServer) -> OpenCageGeocoder {
        let mut settings = GeocoderSettings::new(Provider::OpenCage, ApiKey::new("test-key"));
        settings.endpoint = server.url("/geocode/v1/json");
        OpenCageGeocoder::new(settings).unwrap()
    }

    #[tokio::test]
    async fn test_forward_sends_expected_query_and_reads_first_result() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/geocode/v1/json")
                    .query_param("q", "東京都千代田区丸の内1丁目")
                    .query_param("key", "test-key")
                    .query_param("language", "ja")
                    .query_param("limit", "1");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({
                        "results": [
                            {"formatted": "丸の内一丁目, 千代田区, 日本", "geometry": {"lat": 35.0, "lng": 139.0}},
                            {"geometry": {"lat": 1.0, "lng": 2.0}}
                        ],
                        "rate": {"limit": 2500, "remaining": 2499, "reset": 1700000000},
                        "status": {"code": 200, "message": "OK"}
                    }));
            })
            .await;

        let coords = geocoder_for(&server)
            .forward("東京都千代田区丸の内1丁目")
            .await
            .unwrap();

        api_mock.assert_async().await;
        assert_eq!(
            coords,
            Some(Coordinates {
                latitude: 35.0,
                longitude: 139.0
            })
        );
    }

    #[tokio::test]
    async fn test_forward_empty_results_is_no_match() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/geocode/v1/json");
                then.status(200).json_body(serde_json::json!({
                    "results": [],
                    "status": {"code": 200, "message": "OK"},
                    "total_results": 0
                }));
            })
            .await;

        let coords = geocoder_for(&server).forward("どこでもない").await.unwrap();
        assert_eq!(coords, None);
    }

    #[tokio::test]
    async fn test_forward_error_status_carries_service_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/geocode/v1/json");
                then.status(401).json_body(serde_json::json!({
                    "results": [],
                    "status": {"code": 401, "message": "invalid API key"}
                }));
            })
            .await;

        let err = geocoder_for(&server).forward("大阪府").await.unwrap_err();
        match err {
            EtlError::ApiStatusError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid API key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_forward_malformed_body_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/geocode/v1/json");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = geocoder_for(&server).forward("京都府").await.unwrap_err();
        assert!(matches!(err, EtlError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_forward_missing_results_field_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/geocode/v1/json");
                then.status(200)
                    .json_body(serde_json::json!({"status": {"code": 200, "message": "OK"}}));
            })
            .await;

        assert!(geocoder_for(&server).forward("札幌市").await.is_err());
    }

    #[tokio::test]
    async fn test_forward_connection_refused_is_an_error() {
        let mut settings =
            GeocoderSettings::new(Provider::OpenCage, ApiKey::new("SUPER-SECRET-KEY"));
        settings.endpoint = "http://127.0.0.1:1/geocode/v1/json".to_string();
        let geocoder = OpenCageGeocoder::new(settings).unwrap();

        let err = geocoder.forward("福岡市").await.unwrap_err();
        assert!(matches!(err, EtlError::ApiError(_)));
        // 錯誤訊息會被記錄並寫進 Failed 原因，不可帶出金鑰
        let message = err.to_string();
        assert!(!message.contains("SUPER-SECRET-KEY"), "key leaked: {message}");
        assert!(!err.user_friendly_message().contains("SUPER-SECRET-KEY"));
    }
}
