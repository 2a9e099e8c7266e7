use crate::domain::model::{Coordinates, EnrichmentResult, InputRow, OutputColumns};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn address_column(&self) -> &str;
    fn output_columns(&self) -> OutputColumns;
    fn request_delay(&self) -> Duration;
}

/// Forward geocoding: `Ok(None)` means the service answered but found nothing.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, address: &str) -> Result<Option<Coordinates>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<InputRow>>;
    async fn transform(&self, rows: Vec<InputRow>) -> Result<EnrichmentResult>;
    async fn load(&self, result: &EnrichmentResult) -> Result<String>;
}
