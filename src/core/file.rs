//! The metric file: a bundle of records plus file-level stage metadata.

use super::record::MetricRecord;
use super::types::{FileStage, Stage, StageStamps, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// File-level keys owned by the pipeline.
pub(crate) const FILE_OWNED_KEYS: [&str; 7] = [
    "metrics",
    "stage",
    "processed_at",
    "ready_for_dashboard",
    "curated_at",
    "transformed_at",
    "served_at",
];

/// One metric file. Its relative path is preserved across stage directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricFile {
    pub metrics: Vec<MetricRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<FileStage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub ready_for_dashboard: bool,

    #[serde(flatten)]
    pub stamps: StageStamps,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl MetricFile {
    pub fn new(metrics: Vec<MetricRecord>) -> Self {
        Self {
            metrics,
            stage: None,
            processed_at: None,
            ready_for_dashboard: false,
            stamps: StageStamps::default(),
            extra: Map::new(),
        }
    }

    /// Stamp the file as having completed `stage` at `at`.
    pub fn promote(&mut self, stage: Stage, at: Timestamp) {
        self.stage = Some(stage.output());
        self.processed_at = Some(at);
        self.stamps.stamp(stage, at);
    }

    /// Pretty JSON with a trailing newline, as written to disk.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MetricValue;
    use chrono::{TimeZone, Utc};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_curated_file_with_extras() {
        let json = indoc! {r#"
            {
              "source": "pdoom-data",
              "metrics": [
                {"name": "a", "value": 5, "quality_check": "passed", "curated_at": "2025-01-01T00:00:00Z"}
              ],
              "stage": "curated",
              "curated_at": "2025-01-01T00:00:00Z"
            }
        "#};

        let file: MetricFile = serde_json::from_str(json).unwrap();

        assert_eq!(file.stage, Some(FileStage::Curated));
        assert_eq!(file.metrics.len(), 1);
        assert!(file.stamps.curated_at.is_some());
        assert!(!file.ready_for_dashboard);
        assert_eq!(file.extra.get("source"), Some(&Value::from("pdoom-data")));
    }

    #[test]
    fn test_promote_sets_stage_and_stamp() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut file = MetricFile::new(vec![MetricRecord::new(
            "a",
            MetricValue::Number(1.into()),
        )]);

        file.promote(Stage::Transform, at);

        assert_eq!(file.stage, Some(FileStage::Transformed));
        assert_eq!(file.processed_at, Some(at));
        assert_eq!(file.stamps.transformed_at, Some(at));
        assert_eq!(file.stamps.curated_at, None);
    }

    #[test]
    fn test_ready_flag_omitted_until_set() {
        let mut file = MetricFile::new(vec![]);
        let json = file.to_json_pretty().unwrap();
        assert!(!json.contains("ready_for_dashboard"));
        assert!(json.ends_with('\n'));

        file.ready_for_dashboard = true;
        let json = file.to_json_pretty().unwrap();
        assert!(json.contains("\"ready_for_dashboard\": true"));
    }
}
