// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod pipeline;
pub mod run_log;
pub mod sources;

// Re-export commonly used types
pub use crate::core::{
    FileStage, Magnitude, MetricFile, MetricRecord, MetricValue, Quality, Stage, StageStamps,
    Timestamp,
};

pub use crate::errors::{FailureKind, FileFailure, FileResults, PipelineError, Result};

pub use crate::pipeline::{
    DataLayout, Orchestrator, OrchestratorOptions, PipelineSummary, StageReport, StageSelector,
};

pub use crate::run_log::{RunLog, RunLogEntry, RunLogStore};

pub use crate::sources::{
    DataSource, DefaultValueProvider, FetchError, Ingestor, SampleDataProvider, SourceAdapter,
    SourceDescriptor,
};

pub use crate::io::{FileSystem, MemoryFileSystem, RealFileSystem};
