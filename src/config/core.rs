use crate::errors::PipelineError;
use crate::run_log::DEFAULT_CAPACITY;
use crate::sources::adapter::{DEFAULT_EXPORT_DIR, DEFAULT_REMOTE_BASE};
use crate::sources::{MetricSource, RemoteRepo, SourceDescriptor, SourceKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure, read from `.pipeline.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub pipeline: StageConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    /// Metric source catalogue consumed by `ingest`
    #[serde(default = "default_catalogue")]
    pub metrics: Vec<MetricSource>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            pipeline: StageConfig::default(),
            sources: SourcesConfig::default(),
            metrics: default_catalogue(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Pipeline data root containing `raw/`, `curated/`, ...
    #[serde(default = "default_data_root")]
    pub root: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: default_data_root(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Process files within a stage in parallel
    #[serde(default)]
    pub parallel: bool,

    /// Worker threads for parallel stages (0 = one per core)
    #[serde(default)]
    pub jobs: usize,

    /// Maximum number of run-log entries kept
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,

    /// Glob patterns of input paths (relative to a stage directory) to skip
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            jobs: 0,
            log_capacity: default_log_capacity(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_remote_repo_base")]
    pub remote_repo_base: String,

    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    /// Upper bound on any single remote fetch
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            remote_repo_base: default_remote_repo_base(),
            export_dir: default_export_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SourcesConfig {
    pub fn remote_repo(&self) -> RemoteRepo {
        RemoteRepo {
            base_url: self.remote_repo_base.clone(),
            export_dir: self.export_dir.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_data_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_remote_repo_base() -> String {
    DEFAULT_REMOTE_BASE.to_string()
}

fn default_export_dir() -> String {
    DEFAULT_EXPORT_DIR.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// The dashboard's standard metric catalogue.
pub fn default_catalogue() -> Vec<MetricSource> {
    [
        ("safety_researchers", "Safety Researchers", true),
        ("governance_researchers", "Gov Researchers", true),
        ("capabilities_researchers", "Capabilities Researchers", true),
        ("funding_overview", "Funding Overview", true),
        ("aisi_status", "AI Safety Institutes", false),
        ("governance_scores", "Global Gov Score", true),
    ]
    .into_iter()
    .map(|(id, title, placeholder)| MetricSource {
        id: id.to_string(),
        title: title.to_string(),
        data_source: SourceDescriptor::new(SourceKind::RemoteRepo, format!("{}.json", id)),
        placeholder,
    })
    .collect()
}

impl PipelineConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(1..=DEFAULT_CAPACITY).contains(&self.pipeline.log_capacity) {
            return Err(PipelineError::config(format!(
                "pipeline.log_capacity must be between 1 and {}",
                DEFAULT_CAPACITY
            )));
        }

        if self.sources.timeout_secs == 0 {
            return Err(PipelineError::config(
                "sources.timeout_secs must be at least 1",
            ));
        }

        for pattern in &self.pipeline.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                PipelineError::config(format!("invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }

        let mut seen = HashSet::new();
        for metric in &self.metrics {
            if metric.id.trim().is_empty() {
                return Err(PipelineError::config("metric id must not be empty"));
            }
            if !seen.insert(metric.id.as_str()) {
                return Err(PipelineError::config(format!(
                    "duplicate metric id '{}'",
                    metric.id
                )));
            }
        }

        Ok(())
    }
}
