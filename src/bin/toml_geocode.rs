use clap::Parser;
use geocode_csv::app::runner;
use geocode_csv::core::ConfigProvider;
use geocode_csv::utils::logger;
use geocode_csv::{EtlEngine, GeocodePipeline, LocalStorage, ProviderGeocoder, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-geocode")]
#[command(about = "Geocode a CSV of addresses using a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "geocode.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Override the delay between requests (milliseconds)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Dry run - read and check the input without calling the API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // 初始化日誌
    logger::init(args.verbose, args.log_json);

    tracing::info!("🚀 Starting TOML-based geocoding");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(delay_ms) = args.delay_ms {
        config.rate_limit.delay_ms = Some(delay_ms);
        tracing::info!("🔧 Request delay overridden to: {}ms", delay_ms);
    }

    if let Err(e) = config.validate_config(args.dry_run) {
        std::process::exit(runner::report_error("Configuration validation failed", &e));
    }

    tracing::info!(
        "✅ Job '{}': {} -> {} (column '{}', {:?} between requests)",
        config.job_name(),
        config.input_path(),
        config.output_path(),
        config.address_column(),
        config.request_delay()
    );
    tracing::info!("🌐 Geocoding provider: {}", config.geocoder.provider);
    tracing::debug!("TOML config: {:?}", config);

    let geocoder = match ProviderGeocoder::new(config.geocoder_settings()) {
        Ok(geocoder) => geocoder,
        Err(e) => std::process::exit(runner::report_error("Failed to build HTTP client", &e)),
    };

    let pipeline = GeocodePipeline::new(LocalStorage::new(), config, geocoder);
    let engine = EtlEngine::new(pipeline);

    let exit_code = runner::execute(&engine, args.dry_run).await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
