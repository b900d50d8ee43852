//! Sample payloads used when a source is a placeholder or cannot be fetched.

use crate::core::Timestamp;
use serde_json::{json, Value};
use std::str::FromStr;

/// Metrics with curated sample values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownMetric {
    SafetyResearchers,
    GovernanceResearchers,
    CapabilitiesResearchers,
}

impl KnownMetric {
    pub const ALL: [KnownMetric; 3] = [
        KnownMetric::SafetyResearchers,
        KnownMetric::GovernanceResearchers,
        KnownMetric::CapabilitiesResearchers,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            KnownMetric::SafetyResearchers => "safety_researchers",
            KnownMetric::GovernanceResearchers => "governance_researchers",
            KnownMetric::CapabilitiesResearchers => "capabilities_researchers",
        }
    }

    fn sample(&self, last_updated: &str) -> Value {
        match self {
            KnownMetric::SafetyResearchers => json!({
                "current_value": 847,
                "trend": "+23",
                "trend_period": "30d",
                "last_updated": last_updated,
                "breakdown": {
                    "academic": 312,
                    "industry": 289,
                    "independent": 246
                },
                "confidence": "low"
            }),
            KnownMetric::GovernanceResearchers => json!({
                "current_value": 312,
                "trend": "+8",
                "trend_period": "30d",
                "last_updated": last_updated,
                "confidence": "medium"
            }),
            KnownMetric::CapabilitiesResearchers => json!({
                "current_value": 15247,
                "trend": "+892",
                "trend_period": "30d",
                "last_updated": last_updated,
                "alerts": ["accelerating_hiring"],
                "confidence": "low"
            }),
        }
    }
}

impl FromStr for KnownMetric {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownMetric::ALL
            .into_iter()
            .find(|metric| metric.id() == s)
            .ok_or(())
    }
}

/// Supplies a payload for a metric whose real source is unavailable.
pub trait DefaultValueProvider: Send + Sync {
    fn default_payload(&self, metric_id: &str, now: Timestamp) -> Value;
}

/// Built-in sample data; unknown ids get a zero value with `unknown`
/// confidence.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleDataProvider;

impl DefaultValueProvider for SampleDataProvider {
    fn default_payload(&self, metric_id: &str, now: Timestamp) -> Value {
        let last_updated = now.to_rfc3339();
        match metric_id.parse::<KnownMetric>() {
            Ok(metric) => metric.sample(&last_updated),
            Err(()) => json!({
                "current_value": 0,
                "trend": "±0",
                "trend_period": "30d",
                "last_updated": last_updated,
                "confidence": "unknown"
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_metric_samples() {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let payload = SampleDataProvider.default_payload("safety_researchers", now);

        assert_eq!(payload["current_value"], 847);
        assert_eq!(payload["breakdown"]["independent"], 246);
        assert_eq!(payload["last_updated"], "2025-02-01T00:00:00+00:00");

        let payload = SampleDataProvider.default_payload("capabilities_researchers", now);
        assert_eq!(payload["alerts"], json!(["accelerating_hiring"]));
    }

    #[test]
    fn test_unknown_metric_fallback() {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let payload = SampleDataProvider.default_payload("funding_overview", now);

        assert_eq!(payload["current_value"], 0);
        assert_eq!(payload["trend"], "±0");
        assert_eq!(payload["confidence"], "unknown");
    }

    #[test]
    fn test_known_metric_ids_round_trip() {
        for metric in KnownMetric::ALL {
            assert_eq!(metric.id().parse::<KnownMetric>(), Ok(metric));
        }
        assert!("aisi_status".parse::<KnownMetric>().is_err());
    }
}
