use crate::core::etl::{EtlEngine, RunSummary};
use crate::core::Pipeline;
use crate::utils::error::EtlError;

/// 記錄錯誤並輸出使用者可讀的訊息，回傳程序結束碼
pub fn report_error(context: &str, e: &EtlError) -> i32 {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    e.exit_code()
}

fn print_summary(summary: &RunSummary) {
    println!("✅ Geocoding completed: {} rows", summary.total);
    println!(
        "   resolved: {}, no match: {}, skipped: {}, failed: {}",
        summary.counts.resolved,
        summary.counts.no_match,
        summary.counts.skipped,
        summary.counts.failed
    );
    println!("📁 Output saved to: {}", summary.output_path);
}

/// 執行整個批次；列層級的失敗不影響結束碼
pub async fn execute<P: Pipeline>(engine: &EtlEngine<P>, dry_run: bool) -> i32 {
    if dry_run {
        return match engine.dry_run().await {
            Ok(rows) => {
                println!("🔍 Dry run OK: {} rows ready for geocoding", rows);
                0
            }
            Err(e) => report_error("Dry run failed", &e),
        };
    }

    match engine.run().await {
        Ok(summary) => {
            print_summary(&summary);
            0
        }
        Err(e) => report_error("Geocoding run failed", &e),
    }
}
