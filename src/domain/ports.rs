use crate::domain::model::{Record, RunSummary};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 純粹的逐筆轉換
pub trait RecordTransform: Send + Sync {
    fn apply(&self, record: Record) -> Record;

    /// 日誌用的簡短描述
    fn describe(&self) -> String;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn name(&self) -> &str;
    async fn execute(&self) -> Result<RunSummary>;
}
