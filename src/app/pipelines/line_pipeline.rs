use crate::adapters::storage::LocalStorage;
use crate::core::dataset::transform_lines;
use crate::core::{DatasetFormat, Pipeline, RecordTransform, RunSummary};
use crate::utils::error::{EtlError, Result};

/// 逐行模式：輸入與輸出同時開啟，一行一筆串流處理
pub struct LinePipeline<T: RecordTransform> {
    pub(crate) storage: LocalStorage,
    pub(crate) transform: T,
    pub(crate) input_path: String,
    pub(crate) output_path: String,
}

impl<T: RecordTransform> LinePipeline<T> {
    pub fn new(
        storage: LocalStorage,
        transform: T,
        input_path: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            transform,
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }
}

#[async_trait::async_trait]
impl<T: RecordTransform> Pipeline for LinePipeline<T> {
    fn name(&self) -> &str {
        "line pipeline"
    }

    async fn execute(&self) -> Result<RunSummary> {
        // 先開輸入：找不到檔案時不建立輸出
        let reader = self.storage.open_reader(&self.input_path).await?;
        // 建立輸出會截斷檔案，同一檔案時必須在此擋下
        if self.storage.same_location(&self.input_path, &self.output_path) {
            return Err(EtlError::InvalidConfigValueError {
                field: "output".to_string(),
                value: self.output_path.clone(),
                reason: format!("Output path resolves to the input file {}", self.input_path),
            });
        }
        let mut writer = self.storage.create_writer(&self.output_path).await?;

        tracing::debug!(
            "Streaming {} -> {} with {}",
            self.input_path,
            self.output_path,
            self.transform.describe()
        );
        let stats = transform_lines(reader, &mut writer, &self.transform).await?;

        if stats.skipped > 0 {
            tracing::warn!("⚠️ Skipped {} malformed lines", stats.skipped);
        }

        Ok(RunSummary {
            format: DatasetFormat::Lines,
            processed: stats.processed,
            skipped: stats.skipped,
            output_path: self.output_path.clone(),
        })
    }
}
