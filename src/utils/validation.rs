use crate::utils::error::{EtlError, Result};
use std::path::{Path, PathBuf};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 輸入與輸出不可為同一檔案，否則逐行模式會在讀取前截斷輸入。
/// 相對路徑以目前工作目錄為基準。
pub fn validate_distinct_paths(input: &str, output: &str) -> Result<()> {
    validate_distinct_locations(Path::new(input), Path::new(output))
}

pub fn validate_distinct_locations(input: &Path, output: &Path) -> Result<()> {
    if same_location(input, output) {
        return Err(EtlError::InvalidConfigValueError {
            field: "output".to_string(),
            value: output.display().to_string(),
            reason: format!("Output path resolves to the input file {}", input.display()),
        });
    }
    Ok(())
}

/// 兩個路徑是否指向同一位置（`./`、`..`、絕對路徑與 symlink 皆會解析）
pub fn same_location(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (canonical_location(a), canonical_location(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// 已存在的檔案直接 canonicalize；尚未建立的檔案以 canonical 父目錄加檔名表示
fn canonical_location(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return Some(resolved);
    }
    let file_name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::canonicalize(parent).ok().map(|dir| dir.join(file_name))
}

pub fn validate_positive_number(field_name: &str, value: i64, min_value: i64) -> Result<()> {
    if value < min_value {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
