use crate::app::runner::JobPaths;
use crate::core::transform::{
    TransformSpec, DEFAULT_SOURCE_KEY, DEFAULT_SOURCE_LABEL, DEFAULT_VIEWS_DIVISOR, DEFAULT_VIEWS_FIELD,
    DEFAULT_VIEWS_THRESHOLD,
};
use crate::core::DatasetFormat;
use crate::utils::error::Result;
use crate::utils::validation::{validate_distinct_paths, validate_path, Validate};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Debug, Clone, Parser)]
#[command(name = "novelpedia-etl")]
#[command(about = "Batch fixes for Novelpedia novel metadata datasets")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log process memory and CPU usage")]
    pub monitor: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Stamp every record with a constant label
    Annotate(AnnotateArgs),
    /// Divide inflated view counts at or above a threshold
    CorrectViews(CorrectViewsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DatasetArgs {
    /// Input dataset path
    #[arg(short, long)]
    pub input: String,

    /// Output dataset path
    #[arg(short, long)]
    pub output: String,

    /// Dataset encoding; inferred from the input extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<DatasetFormat>,
}

#[derive(Debug, Clone, Args)]
pub struct AnnotateArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[arg(long, default_value = DEFAULT_SOURCE_KEY)]
    pub key: String,

    #[arg(long, default_value = DEFAULT_SOURCE_LABEL)]
    pub value: String,
}

#[derive(Debug, Clone, Args)]
pub struct CorrectViewsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[arg(long, default_value = DEFAULT_VIEWS_FIELD)]
    pub field: String,

    #[arg(long, default_value_t = DEFAULT_VIEWS_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: i64,

    #[arg(long, default_value_t = DEFAULT_VIEWS_DIVISOR)]
    pub divisor: i64,
}

impl CliConfig {
    pub fn dataset(&self) -> &DatasetArgs {
        match &self.command {
            Command::Annotate(args) => &args.dataset,
            Command::CorrectViews(args) => &args.dataset,
        }
    }

    pub fn job_paths(&self) -> JobPaths {
        let dataset = self.dataset();
        JobPaths::new(dataset.input.clone(), dataset.output.clone(), dataset.format)
    }

    pub fn transform_spec(&self) -> TransformSpec {
        match &self.command {
            Command::Annotate(args) => TransformSpec::Annotate {
                key: args.key.clone(),
                value: Value::String(args.value.clone()),
            },
            Command::CorrectViews(args) => TransformSpec::CorrectOutlier {
                field: args.field.clone(),
                threshold: args.threshold,
                divisor: args.divisor,
            },
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let dataset = self.dataset();
        validate_path("input", &dataset.input)?;
        validate_path("output", &dataset.output)?;
        validate_distinct_paths(&dataset.input, &dataset.output)?;
        self.transform_spec().validate()
    }
}
