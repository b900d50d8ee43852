//! Stage sequencing, per-file accounting, and run-log bookkeeping.
//!
//! Every stage reads only the current on-disk output of the stage before it,
//! so a `full` run behaves exactly like three single-stage runs in a row.

use super::layout::DataLayout;
use super::stage::StageProcessor;
use super::stages::processor_for;
use crate::core::{Stage, Timestamp};
use crate::errors::{FailureKind, FileFailure, FileResults, PipelineError};
use crate::io::walker::{normalize, TreeWalker};
use crate::io::FileSystem;
use crate::run_log::{RunLogEntry, RunLogStore, DEFAULT_CAPACITY};
use chrono::Utc;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which stages a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageSelector {
    Curate,
    Transform,
    Serve,
    #[default]
    Full,
}

impl StageSelector {
    /// The stages to execute, in execution order.
    pub fn stages(&self) -> &'static [Stage] {
        match self {
            StageSelector::Curate => &[Stage::Curate],
            StageSelector::Transform => &[Stage::Transform],
            StageSelector::Serve => &[Stage::Serve],
            StageSelector::Full => &Stage::ALL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageSelector::Curate => "curate",
            StageSelector::Transform => "transform",
            StageSelector::Serve => "serve",
            StageSelector::Full => "full",
        }
    }
}

impl fmt::Display for StageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning knobs for an [`Orchestrator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Process files within a stage on the rayon pool
    pub parallel: bool,
    /// Glob patterns of relative paths to skip
    pub exclude: Vec<String>,
    pub log_capacity: usize,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            exclude: Vec::new(),
            log_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// A file carried through a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    /// Path relative to the stage input (and output) directory
    pub path: PathBuf,
    pub message: String,
    pub records_in: usize,
    pub records_out: usize,
}

/// Outcome of one stage invocation.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub results: FileResults<ProcessedFile>,
    /// The input directory did not exist (or could not be listed)
    pub input_missing: bool,
    pub dry_run: bool,
    /// The entry appended to the run log, or that would have been in dry-run mode
    pub log_entry: RunLogEntry,
}

impl StageReport {
    pub fn files_processed(&self) -> usize {
        self.results.success_count()
    }

    pub fn action(&self) -> &str {
        &self.log_entry.action
    }
}

/// Reports for every stage a run executed, in execution order.
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    pub reports: Vec<StageReport>,
    pub dry_run: bool,
}

impl PipelineSummary {
    pub fn report(&self, stage: Stage) -> Option<&StageReport> {
        self.reports.iter().find(|r| r.stage == stage)
    }

    pub fn total_processed(&self) -> usize {
        self.reports.iter().map(StageReport::files_processed).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.reports.iter().map(|r| r.results.failure_count()).sum()
    }
}

/// Runs stages over a data tree.
pub struct Orchestrator<'a> {
    fs: &'a dyn FileSystem,
    layout: DataLayout,
    options: OrchestratorOptions,
    clock: fn() -> Timestamp,
}

impl<'a> Orchestrator<'a> {
    pub fn new(fs: &'a dyn FileSystem, layout: DataLayout) -> Self {
        Self {
            fs,
            layout,
            options: OrchestratorOptions::default(),
            clock: Utc::now,
        }
    }

    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the wall clock used for stage stamps and log entries.
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Run the selected stages in order, appending one run-log entry after
    /// each stage completes.
    ///
    /// Per-file failures never abort the run; they are reported in the
    /// summary.
    ///
    /// # Errors
    ///
    /// Returns an error only if the run log cannot be read or written, or an
    /// exclude pattern is invalid.
    pub fn run(
        &self,
        selector: StageSelector,
        dry_run: bool,
    ) -> Result<PipelineSummary, PipelineError> {
        let store = RunLogStore::new(
            self.fs,
            self.layout.run_log_path(),
            self.options.log_capacity,
        );

        let mut reports = Vec::with_capacity(selector.stages().len());
        for &stage in selector.stages() {
            let report = self.run_stage(stage, dry_run)?;
            store.append(report.log_entry.clone(), dry_run)?;
            reports.push(report);
        }

        Ok(PipelineSummary { reports, dry_run })
    }

    /// Run one stage without touching the run log.
    pub fn run_stage(&self, stage: Stage, dry_run: bool) -> Result<StageReport, PipelineError> {
        let now = (self.clock)();
        let input = self.layout.input_dir(stage);
        let output = self.layout.output_dir(stage);

        if !self.fs.is_dir(&input) {
            log::warn!(
                "Input directory {} not found, {} stage has nothing to do",
                input.display(),
                stage
            );
            return Ok(self.report(stage, FileResults::default(), true, dry_run));
        }

        let walker =
            TreeWalker::new(self.fs, &input).with_exclude_patterns(&self.options.exclude)?;
        let files = match walker.walk() {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Cannot list {}: {}", input.display(), e);
                return Ok(self.report(stage, FileResults::default(), true, dry_run));
            }
        };

        log::debug!(
            "{} stage: {} input files under {}",
            stage,
            files.len(),
            input.display()
        );

        let processor = processor_for(stage);
        let process = |relative: &PathBuf| {
            self.process_file(&walker, processor.as_ref(), &output, relative, now, dry_run)
        };
        let outcomes: Vec<_> = if self.options.parallel {
            files.par_iter().map(process).collect()
        } else {
            files.iter().map(process).collect()
        };

        let results = FileResults::from_outcomes(outcomes);
        for failure in &results.failures {
            log::warn!(
                "{} stage skipped {} ({}): {}",
                stage,
                normalize(&failure.path),
                failure.kind.as_str(),
                failure.error
            );
        }
        log::info!(
            "{} stage: {} processed, {} failed{}",
            stage,
            results.success_count(),
            results.failure_count(),
            if dry_run { " (dry run)" } else { "" }
        );

        Ok(self.report(stage, results, false, dry_run))
    }

    fn process_file(
        &self,
        walker: &TreeWalker<'_>,
        processor: &dyn StageProcessor,
        output_dir: &Path,
        relative: &Path,
        now: Timestamp,
        dry_run: bool,
    ) -> Result<ProcessedFile, FileFailure> {
        let content = walker
            .read(relative)
            .map_err(|e| FileFailure::new(relative, e.kind(), e))?;

        let output = processor
            .execute(&content, now)
            .map_err(|e| FileFailure::new(relative, e.kind(), e))?;

        let json = output
            .file
            .to_json_pretty()
            .map_err(|e| FileFailure::new(relative, FailureKind::Parse, e))?;

        if !dry_run {
            self.fs
                .write_atomic(&output_dir.join(relative), &json)
                .map_err(|e| FileFailure::new(relative, e.kind(), e))?;
        }

        Ok(ProcessedFile {
            path: relative.to_path_buf(),
            message: output.message,
            records_in: output.records_in,
            records_out: output.records_out,
        })
    }

    fn report(
        &self,
        stage: Stage,
        results: FileResults<ProcessedFile>,
        input_missing: bool,
        dry_run: bool,
    ) -> StageReport {
        let files = results
            .successes
            .iter()
            .map(|file| normalize(&file.path))
            .collect();

        StageReport {
            stage,
            results,
            input_missing,
            dry_run,
            log_entry: RunLogEntry::new(stage, (self.clock)(), files, dry_run),
        }
    }
}
