//! Common type definitions used across the pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock instant used for every provenance stamp.
pub type Timestamp = DateTime<Utc>;

/// Lifecycle position of a metric file; each has its own directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStage {
    Raw,
    Curated,
    Transformed,
    Servable,
}

impl FileStage {
    /// Directory name under the data root
    pub fn dir_name(&self) -> &'static str {
        match self {
            FileStage::Raw => "raw",
            FileStage::Curated => "curated",
            FileStage::Transformed => "transformed",
            FileStage::Servable => "servable",
        }
    }
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A processing step that promotes files from one [`FileStage`] to the next.
///
/// Stages always run in the order of [`Stage::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Curate,
    Transform,
    Serve,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Curate, Stage::Transform, Stage::Serve];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Curate => "curate",
            Stage::Transform => "transform",
            Stage::Serve => "serve",
        }
    }

    /// Action label recorded in the run log
    pub fn action(&self) -> &'static str {
        match self {
            Stage::Curate => "raw_to_curated",
            Stage::Transform => "curated_to_transformed",
            Stage::Serve => "transformed_to_servable",
        }
    }

    pub fn input(&self) -> FileStage {
        match self {
            Stage::Curate => FileStage::Raw,
            Stage::Transform => FileStage::Curated,
            Stage::Serve => FileStage::Transformed,
        }
    }

    pub fn output(&self) -> FileStage {
        match self {
            Stage::Curate => FileStage::Curated,
            Stage::Transform => FileStage::Transformed,
            Stage::Serve => FileStage::Servable,
        }
    }

    /// The stage whose stamp a record must carry before entering this one.
    pub fn previous(&self) -> Option<Stage> {
        match self {
            Stage::Curate => None,
            Stage::Transform => Some(Stage::Curate),
            Stage::Serve => Some(Stage::Transform),
        }
    }

    /// Key of this stage's provenance stamp in the file format
    pub fn stamp_key(&self) -> &'static str {
        match self {
            Stage::Curate => "curated_at",
            Stage::Transform => "transformed_at",
            Stage::Serve => "served_at",
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            Stage::Curate => "CURATION STAGE: Raw -> Curated",
            Stage::Transform => "TRANSFORMATION STAGE: Curated -> Transformed",
            Stage::Serve => "SERVING STAGE: Transformed -> Servable",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of the curation quality check. Absent means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Passed,
    Failed,
}

/// Order-of-magnitude bucket assigned to numeric values by the transform stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Magnitude {
    Low,
    Medium,
    High,
}

impl Magnitude {
    pub const HIGH_THRESHOLD: f64 = 1000.0;
    pub const MEDIUM_THRESHOLD: f64 = 100.0;

    /// `> 1000` is high, `(100, 1000]` is medium, everything else is low.
    pub fn classify(value: f64) -> Magnitude {
        if value > Self::HIGH_THRESHOLD {
            Magnitude::High
        } else if value > Self::MEDIUM_THRESHOLD {
            Magnitude::Medium
        } else {
            Magnitude::Low
        }
    }
}

/// A metric value: a JSON number (kept exact) or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(serde_json::Number),
    Text(String),
}

impl MetricValue {
    /// Accept only the JSON shapes a metric value may take.
    pub fn from_json(value: &serde_json::Value) -> Option<MetricValue> {
        match value {
            serde_json::Value::Number(n) => Some(MetricValue::Number(n.clone())),
            serde_json::Value::String(s) => Some(MetricValue::Text(s.clone())),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => n.as_f64(),
            MetricValue::Text(_) => None,
        }
    }
}

/// Per-stage provenance stamps, keyed by [`Stage`].
///
/// Flattened into records and files using each stage's `stamp_key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStamps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curated_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub served_at: Option<Timestamp>,
}

impl StageStamps {
    pub fn get(&self, stage: Stage) -> Option<Timestamp> {
        match stage {
            Stage::Curate => self.curated_at,
            Stage::Transform => self.transformed_at,
            Stage::Serve => self.served_at,
        }
    }

    pub fn has(&self, stage: Stage) -> bool {
        self.get(stage).is_some()
    }

    pub fn stamp(&mut self, stage: Stage, at: Timestamp) {
        let slot = match stage {
            Stage::Curate => &mut self.curated_at,
            Stage::Transform => &mut self.transformed_at,
            Stage::Serve => &mut self.served_at,
        };
        *slot = Some(at);
    }
}
