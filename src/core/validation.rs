//! Validation rules for raw metric bundles.
//!
//! Two levels:
//! - the bundle must be an object with a `metrics` sequence, or the whole file
//!   is rejected ([`validate`]);
//! - each record must have a non-empty `name` and a present `value`; records
//!   that don't are dropped from the curated output ([`curate_records`]).
//!   This filter is lossy on purpose: only the surviving count is reported.

use super::record::{MetricRecord, RECORD_OWNED_KEYS};
use super::types::MetricValue;
use crate::errors::ValidationError;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Check that a raw document is a valid bundle and return its records.
pub fn validate(document: &Value) -> Result<&[Value], ValidationError> {
    let object = document.as_object().ok_or(ValidationError::NotAnObject)?;
    let metrics = object
        .get("metrics")
        .ok_or(ValidationError::MissingMetricsKey)?;
    metrics
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ValidationError::MetricsNotASequence)
}

/// Why a raw record was left out of the curated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordRejection {
    NotAnObject,
    MissingName,
    EmptyName,
    MissingValue,
    UnsupportedValue,
    DuplicateName,
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NotAnObject => "record is not an object",
            Self::MissingName => "missing name",
            Self::EmptyName => "empty name",
            Self::MissingValue => "missing value",
            Self::UnsupportedValue => "value is neither a number nor a string",
            Self::DuplicateName => "duplicate name",
        };
        f.write_str(reason)
    }
}

/// Build a record from one raw entry, dropping any pipeline-owned keys it
/// carried so that curation always starts from a clean slate.
pub fn validate_record(raw: &Value) -> Result<MetricRecord, RecordRejection> {
    let object = raw.as_object().ok_or(RecordRejection::NotAnObject)?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or(RecordRejection::MissingName)?;
    if name.trim().is_empty() {
        return Err(RecordRejection::EmptyName);
    }

    let value = match object.get("value") {
        None | Some(Value::Null) => return Err(RecordRejection::MissingValue),
        Some(value) => MetricValue::from_json(value).ok_or(RecordRejection::UnsupportedValue)?,
    };

    let mut record = MetricRecord::new(name, value);
    record.extra = strip_keys(object, &RECORD_OWNED_KEYS);
    Ok(record)
}

/// Result of filtering the records of one raw bundle.
#[derive(Debug, Clone, Default)]
pub struct CuratedRecords {
    pub kept: Vec<MetricRecord>,
    /// Index into the raw sequence and the reason it was dropped
    pub rejected: Vec<(usize, RecordRejection)>,
}

/// Keep the valid records of a bundle, in order. Names must be unique within
/// a file; later duplicates are dropped.
pub fn curate_records(raw: &[Value]) -> CuratedRecords {
    let mut seen = HashSet::new();
    let mut curated = CuratedRecords::default();

    for (index, entry) in raw.iter().enumerate() {
        match validate_record(entry) {
            Ok(record) if !seen.insert(record.name.clone()) => {
                curated.rejected.push((index, RecordRejection::DuplicateName));
            }
            Ok(record) => curated.kept.push(record),
            Err(rejection) => curated.rejected.push((index, rejection)),
        }
    }

    curated
}

pub(crate) fn strip_keys(object: &Map<String, Value>, owned: &[&str]) -> Map<String, Value> {
    object
        .iter()
        .filter(|(key, _)| !owned.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_validate_requires_metrics_key() {
        assert_eq!(
            validate(&json!({"data": []})),
            Err(ValidationError::MissingMetricsKey)
        );
        assert_eq!(
            validate(&json!({"metrics": {"a": 1}})),
            Err(ValidationError::MetricsNotASequence)
        );
        assert_eq!(validate(&json!([1, 2])), Err(ValidationError::NotAnObject));
        assert_eq!(validate(&json!({"metrics": []})).map(<[_]>::len), Ok(0));
    }

    #[test]
    fn test_validation_filter_drops_record_without_name() {
        let raw = json!({"metrics": [
            {"name": "a", "value": 5},
            {"value": 9},
            {"name": "b", "value": 1500}
        ]});

        let records = validate(&raw).unwrap();
        let curated = curate_records(records);

        let names: Vec<_> = curated.kept.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(curated.rejected, vec![(1, RecordRejection::MissingName)]);
    }

    #[test]
    fn test_validate_record_rejections() {
        assert_eq!(
            validate_record(&json!({"name": "  ", "value": 1})),
            Err(RecordRejection::EmptyName)
        );
        assert_eq!(
            validate_record(&json!({"name": "a"})),
            Err(RecordRejection::MissingValue)
        );
        assert_eq!(
            validate_record(&json!({"name": "a", "value": null})),
            Err(RecordRejection::MissingValue)
        );
        assert_eq!(
            validate_record(&json!({"name": "a", "value": [1]})),
            Err(RecordRejection::UnsupportedValue)
        );
        assert_eq!(validate_record(&json!("a")), Err(RecordRejection::NotAnObject));
    }

    #[test]
    fn test_validate_record_strips_pipeline_owned_keys() {
        let record = validate_record(&json!({
            "name": "a",
            "value": 1200,
            "magnitude": "low",
            "served_at": "2020-01-01T00:00:00Z",
            "unit": "people"
        }))
        .unwrap();

        assert_eq!(record.magnitude, None);
        assert_eq!(record.stamps.served_at, None);
        assert_eq!(record.extra, json!({"unit": "people"}).as_object().cloned().unwrap());
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let raw = json!([
            {"name": "a", "value": 1},
            {"name": "a", "value": 2}
        ]);
        let curated = curate_records(raw.as_array().unwrap());

        assert_eq!(curated.kept.len(), 1);
        assert_eq!(curated.kept[0].value, MetricValue::Number(1.into()));
        assert_eq!(curated.rejected, vec![(1, RecordRejection::DuplicateName)]);
    }
}
