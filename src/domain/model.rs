use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::Path;

/// 一筆小說的中繼資料。欄位順序依輸入保留（serde_json `preserve_order`）。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

/// 單一欄位查詢結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Absent,
    /// 任何落在 i128 範圍內的 JSON 整數
    Integer(i128),
    /// 非整數值：字串、浮點數、布林、null、物件或陣列
    Other(&'a Value),
}

impl Record {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// 物件以外的 JSON 值不是合法記錄
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(data) => Some(Self { data }),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }

    pub fn field(&self, key: &str) -> FieldValue<'_> {
        match self.data.get(key) {
            None => FieldValue::Absent,
            // arbitrary_precision 下數字保留原始文字；超出 i128 的整數原樣留在 Other
            Some(value) => match value {
                Value::Number(n) => match n.to_string().parse::<i128>() {
                    Ok(v) => FieldValue::Integer(v),
                    Err(_) => FieldValue::Other(value),
                },
                _ => FieldValue::Other(value),
            },
        }
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    /// 以精確的整數文字寫回
    pub fn set_integer(&mut self, key: &str, value: i128) -> bool {
        match value.to_string().parse::<Number>() {
            Ok(number) => {
                self.set(key, Value::Number(number));
                true
            }
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    /// 整個檔案是一個 JSON 陣列
    Array,
    /// 每行一個 JSON 物件
    Lines,
}

impl DatasetFormat {
    pub fn infer(path: &str) -> Self {
        match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("jsonl") | Some("ndjson") => DatasetFormat::Lines,
            _ => DatasetFormat::Array,
        }
    }

    pub fn resolve(explicit: Option<Self>, path: &str) -> Self {
        explicit.unwrap_or_else(|| Self::infer(path))
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetFormat::Array => write!(f, "array"),
            DatasetFormat::Lines => write!(f, "lines"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub format: DatasetFormat,
    pub processed: usize,
    pub skipped: usize,
    pub output_path: String,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} records ({} skipped). Output written to {}",
            self.processed, self.skipped, self.output_path
        )
    }
}
