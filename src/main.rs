use clap::Parser;
use geocode_csv::app::runner;
use geocode_csv::utils::{logger, validation::Validate};
use geocode_csv::{CliConfig, EtlEngine, GeocodePipeline, LocalStorage, ProviderGeocoder};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init(config.verbose, config.log_json);

    tracing::info!("Starting geocode-csv");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        std::process::exit(runner::report_error("Configuration validation failed", &e));
    }

    let geocoder = match ProviderGeocoder::new(config.geocoder_settings()) {
        Ok(geocoder) => geocoder,
        Err(e) => std::process::exit(runner::report_error("Failed to build HTTP client", &e)),
    };

    let dry_run = config.dry_run;
    let pipeline = GeocodePipeline::new(LocalStorage::new(), config, geocoder);
    let engine = EtlEngine::new(pipeline);

    let exit_code = runner::execute(&engine, dry_run).await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
