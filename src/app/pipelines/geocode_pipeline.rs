use crate::adapters::csv_table;
use crate::core::{
    ConfigProvider, EnrichmentResult, GeocodeOutcome, Geocoder, InputRow, OutputRow, Pipeline,
    Storage,
};
use crate::utils::error::Result;
use crate::utils::throttle::RequestThrottle;

/// 逐列呼叫地理編碼 API 並寫回 CSV 的管道
pub struct GeocodePipeline<S: Storage, C: ConfigProvider, G: Geocoder> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) geocoder: G,
}

impl<S: Storage, C: ConfigProvider, G: Geocoder> GeocodePipeline<S, C, G> {
    pub fn new(storage: S, config: C, geocoder: G) -> Self {
        Self {
            storage,
            config,
            geocoder,
        }
    }

    async fn geocode_row(&self, row: &InputRow) -> GeocodeOutcome {
        match self.geocoder.forward(&row.address).await {
            Ok(Some(coords)) => {
                tracing::info!(
                    "✅ [{}] lat: {}, lng: {}",
                    row.position,
                    coords.latitude,
                    coords.longitude
                );
                GeocodeOutcome::Resolved(coords)
            }
            Ok(None) => {
                tracing::warn!("⚠️ [{}] No geocoding result for '{}'", row.position, row.address);
                GeocodeOutcome::NoMatch
            }
            Err(e) => {
                tracing::error!("❌ [{}] Geocoding failed for '{}': {}", row.position, row.address, e);
                GeocodeOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, G: Geocoder> Pipeline for GeocodePipeline<S, C, G> {
    async fn extract(&self) -> Result<Vec<InputRow>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading input from: {}", input_path);

        let data = self.storage.read_file(input_path).await?;
        let rows = csv_table::read_addresses(&data, self.config.address_column())?;

        tracing::info!(
            "📊 Read {} rows from {} (column '{}')",
            rows.len(),
            input_path,
            self.config.address_column()
        );
        Ok(rows)
    }

    async fn transform(&self, rows: Vec<InputRow>) -> Result<EnrichmentResult> {
        let total = rows.len();
        let mut throttle = RequestThrottle::new(self.config.request_delay());
        let mut output = Vec::with_capacity(total);

        tracing::info!(
            "🔧 Geocoding {} addresses ({:?} between requests)",
            total,
            throttle.delay()
        );

        for row in rows {
            let outcome = if row.is_blank() {
                tracing::warn!("⏭️ [{}/{}] Blank address, skipping lookup", row.position, total);
                GeocodeOutcome::Skipped
            } else {
                throttle.wait().await;
                tracing::info!("📍 [{}/{}] Geocoding: {}", row.position, total, row.address);
                self.geocode_row(&row).await
            };

            output.push(OutputRow {
                address: row.address,
                outcome,
            });
        }

        Ok(EnrichmentResult { rows: output })
    }

    async fn load(&self, result: &EnrichmentResult) -> Result<String> {
        let output_path = self.config.output_path();
        let data = csv_table::write_rows(&result.rows, &self.config.output_columns())?;

        tracing::debug!("Writing {} bytes to {}", data.len(), output_path);
        self.storage.write_file(output_path, &data).await?;

        tracing::info!("💾 Saved {} rows to {}", result.rows.len(), output_path);
        Ok(output_path.to_string())
    }
}
