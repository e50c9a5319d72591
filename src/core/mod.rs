pub mod dataset;
pub mod etl;
pub mod transform;

pub use crate::domain::model::{DatasetFormat, FieldValue, Record, RunSummary};
pub use crate::domain::ports::{Pipeline, RecordTransform, Storage};
pub use crate::utils::error::Result;
