//! Error types for pipeline operations.
//!
//! Errors fall into two layers:
//!
//! - [`StageError`]: what a stage processor can report about the *content* of
//!   one file (bad JSON, missing `metrics`, a record that skipped a stage).
//!   Processors never see paths, so these carry no location.
//! - [`PipelineError`]: everything that touches the outside world (files,
//!   configuration, the run log). These carry the path they concern.
//!
//! Per-file failures are never fatal to a stage run; they are collected into
//! [`collection::FileResults`] and reported together.

pub mod collection;

pub use collection::{FailureKind, FileFailure, FileResults};

use std::path::PathBuf;
use thiserror::Error;

/// Structural validation failures for a raw metric bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The document has no top-level `metrics` field.
    #[error("missing metrics key")]
    MissingMetricsKey,

    /// `metrics` exists but is not a sequence.
    #[error("metrics is not a sequence")]
    MetricsNotASequence,

    /// The document is valid JSON but not an object.
    #[error("document is not a JSON object")]
    NotAnObject,
}

/// Content-level failure of a single stage invocation on a single file.
#[derive(Debug, Error)]
pub enum StageError {
    /// The file is not valid JSON, or does not match the metric file shape.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The bundle failed structural validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The file (or one of its records) has not passed the upstream stage.
    #[error("stage order violation: {0}")]
    StageOrder(String),
}

impl StageError {
    /// Create a stage-order violation.
    pub fn stage_order(message: impl Into<String>) -> Self {
        Self::StageOrder(message.into())
    }

    /// Failure category used in per-file reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Parse(_) => FailureKind::Parse,
            Self::Validation(_) => FailureKind::Validation,
            Self::StageOrder(_) => FailureKind::StageOrder,
        }
    }
}

/// Main error type for pipeline operations that touch the filesystem,
/// configuration, or run log.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// File system errors with the offending path
    #[error("I/O error: {message} (path: {})", path.display())]
    Io { message: String, path: PathBuf },

    /// Configuration errors
    #[error("Config error: {message}{}", format_optional_path(path))]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// The run log exists but cannot be read or written
    #[error("Run log error: {message} (path: {})", path.display())]
    RunLog { message: String, path: PathBuf },

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

fn format_optional_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" (file: {})", p.display()))
        .unwrap_or_default()
}

impl PipelineError {
    /// Create an I/O error with path context.
    pub fn io_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path context.
    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a run-log error.
    pub fn run_log(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::RunLog {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Failure category used in per-file reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Json(_) => FailureKind::Parse,
            _ => FailureKind::Io,
        }
    }

    /// Get the associated path, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::RunLog { path, .. } => Some(path),
            Self::Config { path, .. } => path.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, PipelineError>;
