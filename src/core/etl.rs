use crate::core::{OutcomeCounts, Pipeline};
use crate::utils::error::{EtlError, Result};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub counts: OutcomeCounts,
    pub output_path: String,
    pub elapsed: Duration,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        tracing::info!("🚀 Starting geocoding run");

        // Extract：讀檔與欄位檢查失敗時直接中止，不會送出任何請求
        let rows = self.pipeline.extract().await?;
        let total = rows.len();

        // Transform
        let result = self.pipeline.transform(rows).await?;
        if result.rows.len() != total {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "expected {} output rows but produced {}",
                    total,
                    result.rows.len()
                ),
            });
        }
        let counts = result.counts();

        // Load
        let output_path = self.pipeline.load(&result).await?;

        let summary = RunSummary {
            total,
            counts,
            output_path,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            "🏁 Finished {} rows in {:?}: {} resolved, {} no match, {} skipped, {} failed",
            summary.total,
            summary.elapsed,
            counts.resolved,
            counts.no_match,
            counts.skipped,
            counts.failed
        );
        Ok(summary)
    }

    /// 只讀取並檢查輸入，回傳將處理的列數
    pub async fn dry_run(&self) -> Result<usize> {
        tracing::info!("🔍 DRY RUN MODE - no geocoding requests will be sent");
        let rows = self.pipeline.extract().await?;
        let blank = rows.iter().filter(|r| r.is_blank()).count();
        tracing::info!(
            "📋 {} rows found, {} would be geocoded, {} blank",
            rows.len(),
            rows.len() - blank,
            blank
        );
        Ok(rows.len())
    }
}
