pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::JobConfig;

pub use adapters::storage::LocalStorage;
pub use app::pipelines::{ArrayPipeline, LinePipeline};
pub use app::runner::{run_transform, JobPaths};
pub use core::etl::EtlEngine;
pub use core::transform::{Annotate, CorrectOutlier, TransformChain, TransformSpec};
pub use domain::model::{DatasetFormat, FieldValue, Record, RunSummary};
pub use utils::error::{ErrorKind, EtlError, Result};
