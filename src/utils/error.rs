use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[source] reqwest::Error),

    #[error("Geocoding service returned HTTP {status}: {message}")]
    ApiStatusError { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Address column '{column}' not found in input (available columns: {available})")]
    MissingColumnError { column: String, available: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

// 請求 URL 的查詢字串帶有金鑰，轉換時一律去掉 URL
impl From<reqwest::Error> for EtlError {
    fn from(e: reqwest::Error) -> Self {
        EtlError::ApiError(e.without_url())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::ApiStatusError { .. } => ErrorCategory::Network,
            EtlError::InputNotFound { .. }
            | EtlError::MissingColumnError { .. }
            | EtlError::CsvError(_) => ErrorCategory::Input,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單筆地址的網路錯誤不會中止整批作業
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 程序結束碼：0 只保留給完整跑完的批次
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration | ErrorCategory::Data => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::System => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::InputNotFound { path } => {
                format!("Check that '{}' exists and is readable", path)
            }
            EtlError::MissingColumnError { column, .. } => format!(
                "Use --address-column to select the address column, or add a '{}' header to the input",
                column
            ),
            EtlError::CsvError(_) => {
                "Make sure the input is a UTF-8 encoded CSV file with a header row".to_string()
            }
            EtlError::ApiError(_) => {
                "Check network connectivity and the geocoding endpoint URL".to_string()
            }
            EtlError::ApiStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Check that the API key is valid (GEOCODE_API_KEY)".to_string()
            }
            EtlError::ApiStatusError { status, .. } if *status == 402 || *status == 429 => {
                "The free-tier quota is exhausted or requests are too frequent; raise --delay-ms or wait for the quota reset".to_string()
            }
            EtlError::ApiStatusError { .. } => {
                "The geocoding service rejected the request; inspect the response with --verbose".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Provide a value for '{}' via flag, environment or config file", field)
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration values and try again".to_string()
            }
            EtlError::IoError(_) => {
                "Check file permissions and available disk space for the output path".to_string()
            }
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                "Re-run with --verbose to inspect the offending data".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InputNotFound { path } => format!("Input file '{}' could not be found", path),
            EtlError::MissingColumnError { column, available } => format!(
                "The input has no '{}' column (found: {})",
                column, available
            ),
            EtlError::ApiStatusError { status, message } => {
                format!("Geocoding service error {}: {}", status, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
