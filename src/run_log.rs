//! Bounded, append-only history of stage executions.
//!
//! The log lives at `metadata/pipeline_log.json` as
//! `{ "pipeline_runs": [entry, ...] }`, oldest first. It never holds more than
//! its capacity; appending beyond that evicts from the front.

use crate::core::{Stage, Timestamp};
use crate::errors::PipelineError;
use crate::io::FileSystem;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

pub const DEFAULT_CAPACITY: usize = 100;

/// One stage invocation. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub timestamp: Timestamp,
    pub stage: Stage,
    pub action: String,
    pub files_processed: usize,
    /// Relative paths of the promoted files, in walk order
    pub files: Vec<String>,
    pub dry_run: bool,
}

impl RunLogEntry {
    pub fn new(stage: Stage, timestamp: Timestamp, files: Vec<String>, dry_run: bool) -> Self {
        Self {
            timestamp,
            stage,
            action: stage.action().to_string(),
            files_processed: files.len(),
            files,
            dry_run,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RunLogDocument {
    #[serde(default)]
    pipeline_runs: Vec<RunLogEntry>,
}

/// In-memory ring of run-log entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLog {
    entries: VecDeque<RunLogEntry>,
    capacity: usize,
}

impl RunLog {
    /// An empty log. The capacity is clamped to `1..=DEFAULT_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, DEFAULT_CAPACITY);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a log from stored entries, keeping only the newest `capacity`.
    pub fn from_entries(entries: impl IntoIterator<Item = RunLogEntry>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for entry in entries {
            log.append(entry);
        }
        log
    }

    pub fn append(&mut self, entry: RunLogEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &RunLogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The newest `n` entries, oldest first.
    pub fn last(&self, n: usize) -> impl Iterator<Item = &RunLogEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn to_json_pretty(&self) -> serde_json::Result<String> {
        let document = RunLogDocument {
            pipeline_runs: self.entries.iter().cloned().collect(),
        };
        let mut json = serde_json::to_string_pretty(&document)?;
        json.push('\n');
        Ok(json)
    }
}

/// The run log as stored on a [`FileSystem`].
pub struct RunLogStore<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
    capacity: usize,
}

impl<'a> RunLogStore<'a> {
    pub fn new(fs: &'a dyn FileSystem, path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            fs,
            path: path.into(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored log, or an empty one if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::RunLog` if the file exists but cannot be read
    /// or is not a valid run log.
    pub fn load(&self) -> Result<RunLog, PipelineError> {
        if !self.fs.exists(&self.path) {
            return Ok(RunLog::new(self.capacity));
        }

        let content = self
            .fs
            .read_to_string(&self.path)
            .map_err(|e| PipelineError::run_log(e.to_string(), &self.path))?;
        let document: RunLogDocument = serde_json::from_str(&content)
            .map_err(|e| PipelineError::run_log(format!("invalid run log: {}", e), &self.path))?;

        Ok(RunLog::from_entries(document.pipeline_runs, self.capacity))
    }

    /// Append one entry and persist the log. In dry-run mode the log file is
    /// neither read nor written.
    pub fn append(&self, entry: RunLogEntry, dry_run: bool) -> Result<(), PipelineError> {
        if dry_run {
            log::debug!(
                "Dry run: not recording {} run in {}",
                entry.stage,
                self.path.display()
            );
            return Ok(());
        }

        let mut log = self.load()?;
        log.append(entry);
        self.persist(&log)
    }

    fn persist(&self, log: &RunLog) -> Result<(), PipelineError> {
        let json = log
            .to_json_pretty()
            .map_err(|e| PipelineError::run_log(e.to_string(), &self.path))?;
        self.fs
            .write_atomic(&self.path, &json)
            .map_err(|e| PipelineError::run_log(e.to_string(), &self.path))
    }
}
