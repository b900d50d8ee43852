//! Raw -> Curated: validate and clean.

use crate::core::file::FILE_OWNED_KEYS;
use crate::core::validation::strip_keys;
use crate::core::{curate_records, validate, MetricFile, Stage, Timestamp};
use crate::errors::StageError;
use crate::pipeline::stage::{StageOutput, StageProcessor};
use serde_json::Value;

/// Parses loose raw JSON, drops invalid records, and stamps survivors with
/// `quality_check = "passed"` and `curated_at`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurateStage;

impl StageProcessor for CurateStage {
    fn stage(&self) -> Stage {
        Stage::Curate
    }

    fn execute(&self, content: &str, now: Timestamp) -> Result<StageOutput, StageError> {
        let document: Value = serde_json::from_str(content)?;
        let raw_records = validate(&document)?;
        let curated = curate_records(raw_records);

        for (index, rejection) in &curated.rejected {
            log::debug!("Dropping raw record #{}: {}", index, rejection);
        }

        let mut file = MetricFile::new(curated.kept);
        if let Some(object) = document.as_object() {
            file.extra = strip_keys(object, &FILE_OWNED_KEYS);
        }
        for record in &mut file.metrics {
            record.mark_curated(now);
        }
        file.promote(Stage::Curate, now);

        let records_out = file.metrics.len();
        Ok(StageOutput {
            file,
            records_in: raw_records.len(),
            records_out,
            message: format!("{} metrics validated", records_out),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FileStage, Quality};
    use crate::errors::ValidationError;
    use chrono::{TimeZone, Utc};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_curate_filters_invalid_records() {
        let raw = indoc! {r#"
            {"metrics": [
                {"name": "a", "value": 5},
                {"value": 9},
                {"name": "b", "value": 1500}
            ]}
        "#};

        let output = CurateStage.execute(raw, now()).unwrap();

        let names: Vec<_> = output.file.metrics.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(output.records_in, 3);
        assert_eq!(output.records_out, 2);
        assert_eq!(output.message, "2 metrics validated");
    }

    #[test]
    fn test_curate_stamps_records_and_file() {
        let raw = r#"{"metrics": [{"name": "a", "value": 5}], "source": "survey"}"#;

        let output = CurateStage.execute(raw, now()).unwrap();
        let file = output.file;

        assert_eq!(file.stage, Some(FileStage::Curated));
        assert_eq!(file.stamps.curated_at, Some(now()));
        assert_eq!(file.processed_at, Some(now()));
        assert_eq!(file.extra.get("source"), Some(&Value::from("survey")));
        assert_eq!(file.metrics[0].quality, Some(Quality::Passed));
        assert_eq!(file.metrics[0].stamps.curated_at, Some(now()));
    }

    #[test]
    fn test_curate_rejects_missing_metrics_key() {
        let err = CurateStage
            .execute(r#"{"data": []}"#, now())
            .unwrap_err();

        assert!(matches!(
            err,
            StageError::Validation(ValidationError::MissingMetricsKey)
        ));
        assert_eq!(err.to_string(), "missing metrics key");
    }

    #[test]
    fn test_curate_resets_stale_downstream_fields() {
        let raw = indoc! {r#"
            {"stage": "servable", "ready_for_dashboard": true,
             "metrics": [{"name": "a", "value": 5, "magnitude": "high",
                          "served_at": "2020-01-01T00:00:00Z"}]}
        "#};

        let file = CurateStage.execute(raw, now()).unwrap().file;

        assert!(!file.ready_for_dashboard);
        assert_eq!(file.stamps.served_at, None);
        assert_eq!(file.metrics[0].magnitude, None);
        assert_eq!(file.metrics[0].stamps.served_at, None);
    }

    #[test]
    fn test_curate_is_idempotent_apart_from_stamps() {
        let raw = r#"{"metrics": [{"name": "a", "value": 5, "unit": "people"}]}"#;
        let later = Utc.with_ymd_and_hms(2025, 5, 2, 9, 30, 0).unwrap();

        let first = CurateStage.execute(raw, now()).unwrap().file;
        let mut second = CurateStage.execute(raw, later).unwrap().file;

        second.processed_at = first.processed_at;
        second.stamps = first.stamps.clone();
        for (a, b) in second.metrics.iter_mut().zip(&first.metrics) {
            a.stamps = b.stamps.clone();
        }
        assert_eq!(first, second);
    }
}
