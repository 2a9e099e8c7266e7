pub mod api_key;
pub mod cli;
pub mod toml_config;

pub use api_key::ApiKey;

use crate::adapters::provider::{self, GeocoderSettings, Provider};
use crate::core::ConfigProvider;
use crate::domain::model::OutputColumns;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_ADDRESS_COLUMN: &str = "住所";
pub const DEFAULT_LATITUDE_COLUMN: &str = "緯度";
pub const DEFAULT_LONGITUDE_COLUMN: &str = "経度";
pub const DEFAULT_OUTPUT_PATH: &str = "geocoded_output.csv";
/// 免費方案每秒一次請求
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "geocode-csv")]
#[command(about = "Add latitude/longitude to a CSV of addresses using the OpenCage or Mapbox geocoding API")]
pub struct CliConfig {
    /// Input CSV containing an address column
    #[arg(long, env = "GEOCODE_INPUT")]
    pub input: String,

    /// Output CSV (UTF-8 with BOM)
    #[arg(long, env = "GEOCODE_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: String,

    /// Geocoding service
    #[arg(long, env = "GEOCODE_PROVIDER", value_enum, default_value_t = Provider::OpenCage)]
    pub provider: Provider,

    /// API key (OpenCage) or access token (Mapbox)
    #[arg(long, env = "GEOCODE_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: ApiKey,

    /// Override the provider's default endpoint
    #[arg(long, env = "GEOCODE_API_ENDPOINT")]
    pub api_endpoint: Option<String>,

    #[arg(long, default_value = DEFAULT_ADDRESS_COLUMN)]
    pub address_column: String,

    #[arg(long, default_value = DEFAULT_LATITUDE_COLUMN)]
    pub latitude_column: String,

    #[arg(long, default_value = DEFAULT_LONGITUDE_COLUMN)]
    pub longitude_column: String,

    /// Response language code
    #[arg(long, default_value = provider::DEFAULT_LANGUAGE)]
    pub language: String,

    /// Pause between consecutive requests, in milliseconds
    #[arg(long, env = "GEOCODE_DELAY_MS", default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = provider::DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Read and check the input without calling the geocoding API
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn geocoder_settings(&self) -> GeocoderSettings {
        GeocoderSettings {
            provider: self.provider,
            endpoint: self
                .api_endpoint
                .clone()
                .unwrap_or_else(|| self.provider.default_endpoint().to_string()),
            api_key: self.api_key.clone(),
            language: self.language.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn address_column(&self) -> &str {
        &self.address_column
    }

    fn output_columns(&self) -> OutputColumns {
        OutputColumns {
            address: self.address_column.clone(),
            latitude: self.latitude_column.clone(),
            longitude: self.longitude_column.clone(),
        }
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_job(self, &self.geocoder_settings(), self.dry_run)
    }
}

/// 兩種設定來源共用的檢查
pub(crate) fn validate_job<C: ConfigProvider>(
    config: &C,
    geocoder: &GeocoderSettings,
    dry_run: bool,
) -> Result<()> {
    validation::validate_path("input", config.input_path())?;
    validation::validate_path("output", config.output_path())?;
    validation::validate_non_empty_string("address_column", config.address_column())?;

    let columns = config.output_columns();
    validation::validate_non_empty_string("latitude_column", &columns.latitude)?;
    validation::validate_non_empty_string("longitude_column", &columns.longitude)?;
    validation::validate_distinct(
        "output columns",
        &[
            columns.address.as_str(),
            columns.latitude.as_str(),
            columns.longitude.as_str(),
        ],
    )?;

    validation::validate_url("api_endpoint", &geocoder.endpoint)?;
    validation::validate_non_empty_string("language", &geocoder.language)?;
    validation::validate_range(
        "timeout_seconds",
        geocoder.timeout.as_secs(),
        1,
        MAX_TIMEOUT_SECONDS,
    )?;

    // dry run 不會呼叫 API，不需要金鑰
    if !dry_run {
        validation::validate_secret("api_key", geocoder.api_key.expose())?;
    }

    Ok(())
}
