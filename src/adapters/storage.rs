use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::same_location;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{BufReader, BufWriter};

/// 本機檔案系統。相對路徑以 `base_path` 為基準，絕對路徑原樣使用。
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    /// 兩個路徑解析後是否為同一檔案
    pub fn same_location(&self, a: &str, b: &str) -> bool {
        same_location(&self.resolve(a), &self.resolve(b))
    }

    pub async fn open_reader(&self, path: &str) -> Result<BufReader<File>> {
        let file = File::open(self.resolve(path))
            .await
            .map_err(|e| EtlError::from_io(path, e))?;
        Ok(BufReader::new(file))
    }

    pub async fn create_writer(&self, path: &str) -> Result<BufWriter<File>> {
        let full_path = self.resolve(path);
        ensure_parent(&full_path).await?;
        let file = File::create(full_path).await?;
        Ok(BufWriter::new(file))
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        fs::read(self.resolve(path))
            .await
            .map_err(|e| EtlError::from_io(path, e))
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        ensure_parent(&full_path).await?;
        fs::write(full_path, data).await?;
        Ok(())
    }
}
