use crate::adapters::provider::{self, GeocoderSettings, Provider};
use crate::config::{
    validate_job, ApiKey, DEFAULT_ADDRESS_COLUMN, DEFAULT_DELAY_MS, DEFAULT_LATITUDE_COLUMN,
    DEFAULT_LONGITUDE_COLUMN, DEFAULT_OUTPUT_PATH,
};
use crate::core::ConfigProvider;
use crate::domain::model::OutputColumns;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub job: JobConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobConfig {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub address_column: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub latitude_column: Option<String>,
    pub longitude_column: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default)]
    pub provider: Provider,
    pub endpoint: Option<String>,
    pub api_key: ApiKey,
    pub language: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateLimitConfig {
    pub delay_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEOCODE_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn job_name(&self) -> &str {
        self.job.name.as_deref().unwrap_or("geocode")
    }

    pub fn geocoder_settings(&self) -> GeocoderSettings {
        let provider = self.geocoder.provider;
        GeocoderSettings {
            provider,
            endpoint: self
                .geocoder
                .endpoint
                .clone()
                .unwrap_or_else(|| provider.default_endpoint().to_string()),
            api_key: self.geocoder.api_key.clone(),
            language: self
                .geocoder
                .language
                .clone()
                .unwrap_or_else(|| provider::DEFAULT_LANGUAGE.to_string()),
            timeout: Duration::from_secs(
                self.geocoder
                    .timeout_seconds
                    .unwrap_or(provider::DEFAULT_TIMEOUT_SECONDS),
            ),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self, dry_run: bool) -> Result<()> {
        validate_job(self, &self.geocoder_settings(), dry_run)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn address_column(&self) -> &str {
        self.input
            .address_column
            .as_deref()
            .unwrap_or(DEFAULT_ADDRESS_COLUMN)
    }

    fn output_columns(&self) -> OutputColumns {
        OutputColumns {
            address: self.address_column().to_string(),
            latitude: self
                .output
                .latitude_column
                .clone()
                .unwrap_or_else(|| DEFAULT_LATITUDE_COLUMN.to_string()),
            longitude: self
                .output
                .longitude_column
                .clone()
                .unwrap_or_else(|| DEFAULT_LONGITUDE_COLUMN.to_string()),
        }
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit.delay_ms.unwrap_or(DEFAULT_DELAY_MS))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config(false)
    }
}
