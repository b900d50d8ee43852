//! Metric record model shared by every stage.

pub mod file;
pub mod record;
pub mod types;
pub mod validation;

pub use file::MetricFile;
pub use record::MetricRecord;
pub use types::{FileStage, Magnitude, MetricValue, Quality, Stage, StageStamps, Timestamp};
pub use validation::{curate_records, validate, validate_record, CuratedRecords, RecordRejection};
