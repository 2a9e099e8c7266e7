use crate::adapters::mapbox::{self, MapboxGeocoder};
use crate::adapters::opencage::{self, OpenCageGeocoder};
use crate::config::ApiKey;
use crate::domain::model::Coordinates;
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_LANGUAGE: &str = "ja";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// 每個地址只取第一筆結果
pub(crate) const RESULT_LIMIT: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Provider {
    #[default]
    #[cfg_attr(feature = "cli", value(name = "opencage"))]
    OpenCage,
    #[cfg_attr(feature = "cli", value(name = "mapbox"))]
    Mapbox,
}

impl Provider {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Provider::OpenCage => opencage::DEFAULT_ENDPOINT,
            Provider::Mapbox => mapbox::DEFAULT_ENDPOINT,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenCage => f.write_str("opencage"),
            Provider::Mapbox => f.write_str("mapbox"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocoderSettings {
    pub provider: Provider,
    pub endpoint: String,
    pub api_key: ApiKey,
    pub language: String,
    pub timeout: Duration,
}

impl GeocoderSettings {
    pub fn new(provider: Provider, api_key: ApiKey) -> Self {
        Self {
            provider,
            endpoint: provider.default_endpoint().to_string(),
            api_key,
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

/// 依設定選擇的地理編碼服務
pub enum ProviderGeocoder {
    OpenCage(OpenCageGeocoder),
    Mapbox(MapboxGeocoder),
}

impl ProviderGeocoder {
    pub fn new(settings: GeocoderSettings) -> Result<Self> {
        tracing::debug!("Using {} geocoder at {}", settings.provider, settings.endpoint);
        match settings.provider {
            Provider::OpenCage => Ok(Self::OpenCage(OpenCageGeocoder::new(settings)?)),
            Provider::Mapbox => Ok(Self::Mapbox(MapboxGeocoder::new(settings)?)),
        }
    }
}

#[async_trait]
impl Geocoder for ProviderGeocoder {
    async fn forward(&self, address: &str) -> Result<Option<Coordinates>> {
        match self {
            ProviderGeocoder::OpenCage(geocoder) => geocoder.forward(address).await,
            ProviderGeocoder::Mapbox(geocoder) => geocoder.forward(address).await,
        }
    }
}
