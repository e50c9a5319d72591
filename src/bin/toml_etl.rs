use clap::Parser;
use novelpedia_etl::core::RecordTransform;
use novelpedia_etl::utils::{logger, validation::Validate};
use novelpedia_etl::{run_transform, EtlError, JobConfig, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Run a dataset transformation described by a TOML job file")]
struct Args {
    /// Path to TOML job file
    #[arg(short, long, default_value = "etl-job.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from the job file
    #[arg(long)]
    monitor: Option<bool>,

    /// Show what would be processed without reading or writing datasets
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based dataset job");
    tracing::info!("📁 Loading job from: {}", args.config);

    let config = match JobConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            report_failure(&e);
            println!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        report_failure(&e);
        std::process::exit(1);
    }

    tracing::info!("✅ Job loaded and validated successfully");
    display_job_summary(&config);

    if args.dry_run {
        println!("🔍 DRY RUN MODE - no datasets were read or written");
        return;
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 Resource monitoring enabled");
    }

    let paths = config.job_paths();
    let transform = config.build_transform();

    match run_transform(LocalStorage::default(), &paths, transform, monitor_enabled).await {
        Ok(summary) => println!("✅ {}", summary),
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    }
}

fn display_job_summary(config: &JobConfig) {
    let paths = config.job_paths();
    println!("📋 Job Summary:");
    println!("  Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {} ({})", paths.input, paths.format);
    println!("  Output: {}", paths.output);
    println!("  Transform: {}", config.build_transform().describe());
    println!();
}

fn report_failure(e: &EtlError) {
    tracing::error!("❌ Job failed: {} (Kind: {:?})", e, e.kind());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    println!("❌ {}", e.user_friendly_message());
}
