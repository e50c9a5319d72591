use crate::core::{FieldValue, Record, RecordTransform};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_SOURCE_KEY: &str = "source";
pub const DEFAULT_SOURCE_LABEL: &str = "Novelpia";
pub const DEFAULT_VIEWS_FIELD: &str = "views";
pub const DEFAULT_VIEWS_THRESHOLD: i64 = 10_000_000;
pub const DEFAULT_VIEWS_DIVISOR: i64 = 10;

/// `record[key] = value`，已存在時覆寫
pub fn annotate(mut record: Record, key: &str, value: &Value) -> Record {
    record.set(key, value.clone());
    record
}

/// 整數且 `>= threshold` 時以 floor division 除以 `divisor`；缺欄位或非整數原樣通過
pub fn correct_outlier(mut record: Record, field: &str, threshold: i64, divisor: i64) -> Record {
    if divisor == 0 {
        tracing::warn!("Refusing to divide '{}' by zero", field);
        return record;
    }

    let corrected = match record.field(field) {
        FieldValue::Integer(v) if v >= i128::from(threshold) => Some(floor_div(v, i128::from(divisor))),
        FieldValue::Integer(_) | FieldValue::Absent => None,
        FieldValue::Other(value) => {
            // 非整數的 views 不視為錯誤，只留下 debug 紀錄
            tracing::debug!("Leaving non-integer '{}' untouched: {}", field, value);
            None
        }
    };

    if let Some(corrected) = corrected {
        if !record.set_integer(field, corrected) {
            tracing::warn!("Could not write corrected value {} for '{}'", corrected, field);
        }
    }
    record
}

fn floor_div(value: i128, divisor: i128) -> i128 {
    let quotient = value / divisor;
    if value % divisor != 0 && ((value < 0) != (divisor < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotate {
    pub key: String,
    pub value: Value,
}

impl Annotate {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn source_label(label: impl Into<String>) -> Self {
        Self::new(DEFAULT_SOURCE_KEY, Value::String(label.into()))
    }
}

impl RecordTransform for Annotate {
    fn apply(&self, record: Record) -> Record {
        annotate(record, &self.key, &self.value)
    }

    fn describe(&self) -> String {
        format!("annotate {} = {}", self.key, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectOutlier {
    pub field: String,
    pub threshold: i64,
    pub divisor: i64,
}

impl CorrectOutlier {
    pub fn views() -> Self {
        Self {
            field: DEFAULT_VIEWS_FIELD.to_string(),
            threshold: DEFAULT_VIEWS_THRESHOLD,
            divisor: DEFAULT_VIEWS_DIVISOR,
        }
    }
}

impl RecordTransform for CorrectOutlier {
    fn apply(&self, record: Record) -> Record {
        correct_outlier(record, &self.field, self.threshold, self.divisor)
    }

    fn describe(&self) -> String {
        format!(
            "correct {} >= {} by dividing by {}",
            self.field, self.threshold, self.divisor
        )
    }
}

/// 依序套用的轉換；空鏈即恆等轉換
#[derive(Default)]
pub struct TransformChain {
    steps: Vec<Box<dyn RecordTransform>>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: RecordTransform + 'static>(mut self, step: T) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn from_specs(specs: &[TransformSpec]) -> Self {
        let steps = specs.iter().map(TransformSpec::build).collect();
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl RecordTransform for TransformChain {
    fn apply(&self, record: Record) -> Record {
        self.steps.iter().fold(record, |acc, step| step.apply(acc))
    }

    fn describe(&self) -> String {
        if self.steps.is_empty() {
            return "identity".to_string();
        }
        self.steps
            .iter()
            .map(|step| step.describe())
            .collect::<Vec<_>>()
            .join(", then ")
    }
}

/// 設定檔中的轉換宣告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformSpec {
    Annotate {
        #[serde(default = "default_source_key")]
        key: String,
        value: Value,
    },
    CorrectOutlier {
        #[serde(default = "default_views_field")]
        field: String,
        #[serde(default = "default_views_threshold")]
        threshold: i64,
        #[serde(default = "default_views_divisor")]
        divisor: i64,
    },
}

fn default_source_key() -> String {
    DEFAULT_SOURCE_KEY.to_string()
}

fn default_views_field() -> String {
    DEFAULT_VIEWS_FIELD.to_string()
}

fn default_views_threshold() -> i64 {
    DEFAULT_VIEWS_THRESHOLD
}

fn default_views_divisor() -> i64 {
    DEFAULT_VIEWS_DIVISOR
}

impl TransformSpec {
    pub fn build(&self) -> Box<dyn RecordTransform> {
        match self {
            TransformSpec::Annotate { key, value } => Box::new(Annotate::new(key.clone(), value.clone())),
            TransformSpec::CorrectOutlier {
                field,
                threshold,
                divisor,
            } => Box::new(CorrectOutlier {
                field: field.clone(),
                threshold: *threshold,
                divisor: *divisor,
            }),
        }
    }
}

impl Validate for TransformSpec {
    fn validate(&self) -> Result<()> {
        match self {
            TransformSpec::Annotate { key, .. } => validate_non_empty_string("transform.key", key),
            TransformSpec::CorrectOutlier { field, divisor, .. } => {
                validate_non_empty_string("transform.field", field)?;
                validate_positive_number("transform.divisor", *divisor, 1)
            }
        }
    }
}
