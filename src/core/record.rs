//! The metric record: one named value plus its provenance and classification.

use super::types::{Magnitude, MetricValue, Quality, Stage, StageStamps, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the pipeline itself; they are never carried over from
/// upstream input as opaque extras.
pub(crate) const RECORD_OWNED_KEYS: [&str; 7] = [
    "name",
    "value",
    "quality_check",
    "magnitude",
    "curated_at",
    "transformed_at",
    "served_at",
];

/// A single metric.
///
/// `quality` and `magnitude` are only ever set by the stage that derives
/// them, and are omitted from the serialized form when unset. Any keys the
/// pipeline does not own are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub name: String,
    pub value: MetricValue,

    #[serde(
        rename = "quality_check",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub quality: Option<Quality>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<Magnitude>,

    #[serde(flatten)]
    pub stamps: StageStamps,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetricRecord {
    pub fn new(name: impl Into<String>, value: MetricValue) -> Self {
        Self {
            name: name.into(),
            value,
            quality: None,
            magnitude: None,
            stamps: StageStamps::default(),
            extra: Map::new(),
        }
    }

    /// Whether this record carries the stamp required to enter `stage`.
    pub fn is_eligible_for(&self, stage: Stage) -> bool {
        stage
            .previous()
            .map_or(true, |previous| self.stamps.has(previous))
    }

    /// Record that this metric passed curation.
    pub fn mark_curated(&mut self, at: Timestamp) {
        self.quality = Some(Quality::Passed);
        self.stamps.stamp(Stage::Curate, at);
    }

    /// Assign a magnitude bucket to numeric values; text values stay unclassified.
    pub fn classify(&mut self, at: Timestamp) {
        self.magnitude = self.value.as_f64().map(Magnitude::classify);
        self.stamps.stamp(Stage::Transform, at);
    }

    pub fn mark_served(&mut self, at: Timestamp) {
        self.stamps.stamp(Stage::Serve, at);
    }
}
