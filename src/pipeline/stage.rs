//! Stage processor abstraction.
//!
//! A stage processor turns the content of one input file into one output
//! [`MetricFile`]. Processors are pure: no I/O, no clock access (the
//! timestamp is passed in), no state between calls. Running the same processor
//! on the same input twice yields the same output apart from the stamps.

use crate::core::{MetricFile, Stage, Timestamp};
use crate::errors::StageError;

/// Output of one stage on one file.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub file: MetricFile,
    /// Records seen in the input
    pub records_in: usize,
    /// Records carried into the output
    pub records_out: usize,
    /// Short human summary for the per-file report line
    pub message: String,
}

/// A pipeline stage that transforms a single file.
pub trait StageProcessor: Send + Sync {
    /// Which stage this processor implements.
    fn stage(&self) -> Stage;

    /// Process one file's content.
    fn execute(&self, content: &str, now: Timestamp) -> Result<StageOutput, StageError>;

    /// Get the stage name for progress reporting.
    fn name(&self) -> &str {
        self.stage().name()
    }
}

/// Parse the input of a non-initial stage and check that the file and every
/// record in it went through the previous stage.
pub fn load_promotable(content: &str, stage: Stage) -> Result<MetricFile, StageError> {
    let file: MetricFile = serde_json::from_str(content)?;

    let expected = stage.input();
    if file.stage != Some(expected) {
        return Err(StageError::stage_order(format!(
            "expected a {} file, found {}",
            expected,
            file.stage
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no stage".to_string())
        )));
    }

    if let Some(record) = file.metrics.iter().find(|r| !r.is_eligible_for(stage)) {
        let missing = stage.previous().map(|s| s.stamp_key()).unwrap_or_default();
        return Err(StageError::stage_order(format!(
            "record '{}' has no {}",
            record.name, missing
        )));
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileStage;
    use indoc::indoc;

    #[test]
    fn test_load_promotable_accepts_curated_input() {
        let content = indoc! {r#"
            {"metrics": [{"name": "a", "value": 1, "curated_at": "2025-01-01T00:00:00Z"}],
             "stage": "curated"}
        "#};

        let file = load_promotable(content, Stage::Transform).unwrap();
        assert_eq!(file.stage, Some(FileStage::Curated));
    }

    #[test]
    fn test_load_promotable_rejects_wrong_stage() {
        let content = r#"{"metrics": [], "stage": "raw"}"#;
        let err = load_promotable(content, Stage::Transform).unwrap_err();
        assert_eq!(
            err.to_string(),
            "stage order violation: expected a curated file, found raw"
        );
    }

    #[test]
    fn test_load_promotable_rejects_unstamped_record() {
        let content = indoc! {r#"
            {"metrics": [{"name": "a", "value": 1, "curated_at": "2025-01-01T00:00:00Z"}],
             "stage": "transformed"}
        "#};

        let err = load_promotable(content, Stage::Serve).unwrap_err();
        assert_eq!(
            err.to_string(),
            "stage order violation: record 'a' has no transformed_at"
        );
    }

    #[test]
    fn test_load_promotable_reports_bad_json() {
        let err = load_promotable("{not json", Stage::Serve).unwrap_err();
        assert!(matches!(err, StageError::Parse(_)));
    }
}
