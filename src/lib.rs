pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::mapbox::MapboxGeocoder;
pub use crate::adapters::opencage::OpenCageGeocoder;
pub use crate::adapters::provider::{GeocoderSettings, Provider, ProviderGeocoder};
pub use crate::app::pipelines::geocode_pipeline::GeocodePipeline;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, ApiKey};
pub use crate::core::etl::{EtlEngine, RunSummary};
pub use crate::utils::error::{EtlError, Result};
