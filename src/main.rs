use clap::Parser;
use novelpedia_etl::core::transform::TransformChain;
use novelpedia_etl::utils::logger::{self, LogFormat};
use novelpedia_etl::utils::validation::Validate;
use novelpedia_etl::{run_transform, CliConfig, EtlError, LocalStorage};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    let log_format = if config.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(log_format, config.verbose);

    tracing::info!("Starting novelpedia-etl");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        report_failure(&e);
        std::process::exit(1);
    }

    let paths = config.job_paths();
    let transform = TransformChain::from_specs(&[config.transform_spec()]);

    match run_transform(LocalStorage::default(), &paths, transform, config.monitor).await {
        Ok(summary) => println!("✅ {}", summary),
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    }
}

fn report_failure(e: &EtlError) {
    tracing::error!("❌ Run failed: {} (Kind: {:?})", e, e.kind());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    println!("❌ {}", e.user_friendly_message());
}
