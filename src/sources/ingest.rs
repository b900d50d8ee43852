//! Upstream ingestion: fetch each configured metric source and drop it into
//! the raw stage directory, falling back to sample data when a source is a
//! placeholder or unavailable.
//!
//! Ingestion sits outside the stage chain. Its output is ordinary raw input
//! for the curate stage.

use super::adapter::{DataSource, FetchError};
use super::defaults::DefaultValueProvider;
use super::descriptor::SourceDescriptor;
use crate::core::{FileStage, Timestamp};
use crate::errors::{FailureKind, FileFailure, FileResults, PipelineError};
use crate::io::FileSystem;
use crate::pipeline::DataLayout;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::PathBuf;

fn default_placeholder() -> bool {
    true
}

/// One entry of the metric source catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSource {
    pub id: String,
    pub title: String,
    pub data_source: SourceDescriptor,
    /// Placeholders are never fetched; they always use sample data.
    #[serde(default = "default_placeholder")]
    pub placeholder: bool,
}

/// Where an ingested payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadOrigin {
    Fetched,
    Placeholder,
    Fallback,
}

impl PayloadOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadOrigin::Fetched => "fetched",
            PayloadOrigin::Placeholder => "placeholder",
            PayloadOrigin::Fallback => "fallback",
        }
    }
}

impl fmt::Display for PayloadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric written (or, in dry-run mode, ready to be written) to `raw/`.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedMetric {
    pub id: String,
    /// Path relative to the raw stage directory
    pub path: PathBuf,
    pub origin: PayloadOrigin,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub title: String,
    pub data_source: String,
    pub placeholder: bool,
    pub origin: PayloadOrigin,
    pub last_updated: Option<String>,
    pub confidence: String,
}

/// Freshness and provenance of every ingested source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceManifest {
    pub build_time: Timestamp,
    pub metrics: Vec<ManifestEntry>,
}

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub results: FileResults<IngestedMetric>,
    pub manifest: SourceManifest,
    pub dry_run: bool,
}

impl IngestReport {
    pub fn fallback_count(&self) -> usize {
        self.results
            .successes
            .iter()
            .filter(|m| m.origin != PayloadOrigin::Fetched)
            .count()
    }
}

pub struct Ingestor<'a> {
    fs: &'a dyn FileSystem,
    layout: DataLayout,
    source: &'a dyn DataSource,
    defaults: &'a dyn DefaultValueProvider,
    clock: fn() -> Timestamp,
}

impl<'a> Ingestor<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        layout: DataLayout,
        source: &'a dyn DataSource,
        defaults: &'a dyn DefaultValueProvider,
    ) -> Self {
        Self {
            fs,
            layout,
            source,
            defaults,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    /// Ingest every metric in catalogue order.
    ///
    /// Fetch failures never surface here; they fall back to sample data.
    /// Fetches happen even in dry-run mode; only writes are suppressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the source manifest cannot be written. A raw file
    /// that cannot be written is reported as a per-metric failure.
    pub fn ingest(
        &self,
        metrics: &[MetricSource],
        dry_run: bool,
    ) -> Result<IngestReport, PipelineError> {
        let now = (self.clock)();
        let mut outcomes = Vec::with_capacity(metrics.len());
        let mut entries = Vec::with_capacity(metrics.len());

        for metric in metrics {
            let (payload, origin) = self.resolve(metric, now);
            entries.push(manifest_entry(metric, &payload, origin));
            outcomes.push(self.write_raw(metric, payload, origin, dry_run));
        }

        let manifest = SourceManifest {
            build_time: now,
            metrics: entries,
        };
        if !dry_run {
            let path = self.layout.source_manifest_path();
            let mut json = serde_json::to_string_pretty(&manifest)?;
            json.push('\n');
            self.fs.write_atomic(&path, &json)?;
        }

        let results = FileResults::from_outcomes(outcomes);
        for failure in &results.failures {
            log::warn!("Could not write {}: {}", failure.path.display(), failure.error);
        }

        Ok(IngestReport {
            results,
            manifest,
            dry_run,
        })
    }

    fn resolve(&self, metric: &MetricSource, now: Timestamp) -> (Value, PayloadOrigin) {
        if metric.placeholder {
            log::info!("Using sample data for placeholder metric {}", metric.id);
            return (
                self.defaults.default_payload(&metric.id, now),
                PayloadOrigin::Placeholder,
            );
        }

        match self.fetch_payload(&metric.data_source) {
            Ok(payload) => (payload, PayloadOrigin::Fetched),
            Err(e) => {
                log::info!("Using sample data for {}: {}", metric.id, e);
                (
                    self.defaults.default_payload(&metric.id, now),
                    PayloadOrigin::Fallback,
                )
            }
        }
    }

    fn fetch_payload(&self, descriptor: &SourceDescriptor) -> Result<Value, FetchError> {
        let bytes = self.source.fetch(descriptor)?;
        let malformed = |reason: String| FetchError::Malformed {
            descriptor: descriptor.to_string(),
            reason,
        };

        let payload: Value = serde_json::from_slice(&bytes).map_err(|e| malformed(e.to_string()))?;
        if payload.is_object() {
            Ok(payload)
        } else {
            Err(malformed("payload is not a JSON object".to_string()))
        }
    }

    fn write_raw(
        &self,
        metric: &MetricSource,
        payload: Value,
        origin: PayloadOrigin,
        dry_run: bool,
    ) -> Result<IngestedMetric, FileFailure> {
        let path = self.layout.ingested_raw_path(&metric.id);
        let relative = path
            .strip_prefix(self.layout.stage_dir(FileStage::Raw))
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|_| path.clone());

        let document = to_raw_document(metric, payload);
        let records = document
            .get("metrics")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        if !dry_run {
            let mut json = serde_json::to_string_pretty(&document)
                .map_err(|e| FileFailure::new(&relative, FailureKind::Parse, e))?;
            json.push('\n');
            self.fs
                .write_atomic(&path, &json)
                .map_err(|e| FileFailure::new(&relative, FailureKind::Io, e))?;
        }

        Ok(IngestedMetric {
            id: metric.id.clone(),
            path: relative,
            origin,
            records,
        })
    }
}

/// Shape a source payload as a raw metric file.
///
/// A payload that already carries a `metrics` sequence is used as-is.
/// Otherwise it becomes one record named after the metric, with
/// `current_value` as its value (or the payload's own `value` when there is
/// no `current_value`) and every other payload key kept alongside.
pub fn to_raw_document(metric: &MetricSource, payload: Value) -> Value {
    let Value::Object(mut fields) = payload else {
        return json!({ "metrics": [] });
    };
    if matches!(fields.get("metrics"), Some(Value::Array(_))) {
        return Value::Object(fields);
    }

    let current = fields.remove("current_value");
    let value = fields.remove("value");
    fields.remove("name");

    let mut record = Map::new();
    record.extend(fields);
    record.insert("name".to_string(), Value::from(metric.id.clone()));
    if let Some(value) = current.or(value) {
        record.insert("value".to_string(), value);
    }

    json!({
        "source": metric.data_source.to_string(),
        "title": metric.title,
        "metrics": [record],
    })
}

fn manifest_entry(metric: &MetricSource, payload: &Value, origin: PayloadOrigin) -> ManifestEntry {
    ManifestEntry {
        id: metric.id.clone(),
        title: metric.title.clone(),
        data_source: metric.data_source.to_string(),
        placeholder: metric.placeholder,
        origin,
        last_updated: payload
            .get("last_updated")
            .and_then(Value::as_str)
            .map(str::to_string),
        confidence: payload
            .get("confidence")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
    }
}
