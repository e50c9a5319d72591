use crate::adapters::storage::LocalStorage;
use crate::app::pipelines::{ArrayPipeline, LinePipeline};
use crate::core::etl::EtlEngine;
use crate::core::{DatasetFormat, RecordTransform, RunSummary};
use crate::utils::error::Result;

/// 一次轉換所需的路徑與編碼
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    pub input: String,
    pub output: String,
    pub format: DatasetFormat,
}

impl JobPaths {
    pub fn new(input: impl Into<String>, output: impl Into<String>, format: Option<DatasetFormat>) -> Self {
        let input = input.into();
        let format = DatasetFormat::resolve(format, &input);
        Self {
            input,
            output: output.into(),
            format,
        }
    }
}

/// 依編碼選擇管道並交給 `EtlEngine` 執行
pub async fn run_transform<T>(
    storage: LocalStorage,
    paths: &JobPaths,
    transform: T,
    monitor_enabled: bool,
) -> Result<RunSummary>
where
    T: RecordTransform + 'static,
{
    tracing::info!(
        "📁 {} -> {} ({} mode)",
        paths.input,
        paths.output,
        paths.format
    );

    match paths.format {
        DatasetFormat::Array => {
            let pipeline = ArrayPipeline::new(storage, transform, paths.input.as_str(), paths.output.as_str());
            EtlEngine::new_with_monitoring(pipeline, monitor_enabled).run().await
        }
        DatasetFormat::Lines => {
            let pipeline = LinePipeline::new(storage, transform, paths.input.as_str(), paths.output.as_str());
            EtlEngine::new_with_monitoring(pipeline, monitor_enabled).run().await
        }
    }
}
