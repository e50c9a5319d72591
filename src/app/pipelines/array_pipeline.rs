use crate::core::dataset::{decode_array, encode_array};
use crate::core::{DatasetFormat, Pipeline, RecordTransform, RunSummary, Storage};
use crate::utils::error::Result;

/// 陣列模式：讀入整份檔案、逐筆轉換後一次寫出。解析失敗時不會產生輸出檔。
pub struct ArrayPipeline<S: Storage, T: RecordTransform> {
    pub(crate) storage: S,
    pub(crate) transform: T,
    pub(crate) input_path: String,
    pub(crate) output_path: String,
}

impl<S: Storage, T: RecordTransform> ArrayPipeline<S, T> {
    pub fn new(storage: S, transform: T, input_path: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            storage,
            transform,
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, T: RecordTransform> Pipeline for ArrayPipeline<S, T> {
    fn name(&self) -> &str {
        "array pipeline"
    }

    async fn execute(&self) -> Result<RunSummary> {
        tracing::debug!("Reading JSON array from {}", self.input_path);
        let raw = self.storage.read_file(&self.input_path).await?;
        let records = decode_array(&raw, &self.input_path)?;
        tracing::debug!(
            "Decoded {} records, applying {}",
            records.len(),
            self.transform.describe()
        );

        let transformed: Vec<_> = records
            .into_iter()
            .map(|record| self.transform.apply(record))
            .collect();

        let encoded = encode_array(&transformed)?;
        tracing::debug!("Writing {} bytes to {}", encoded.len(), self.output_path);
        self.storage.write_file(&self.output_path, &encoded).await?;

        Ok(RunSummary {
            format: DatasetFormat::Array,
            processed: transformed.len(),
            skipped: 0,
            output_path: self.output_path.clone(),
        })
    }
}
