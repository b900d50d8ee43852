//! The staged metric pipeline: raw -> curated -> transformed -> servable.
//!
//! Stage processors in [`stages`] are pure functions from file content to a
//! promoted [`MetricFile`](crate::core::MetricFile). All I/O happens in the
//! [`orchestrator`], which walks each stage's input directory, writes outputs
//! atomically, and records every stage invocation in the run log.

pub mod layout;
pub mod orchestrator;
pub mod stage;
pub mod stages;

pub use layout::DataLayout;
pub use orchestrator::{
    Orchestrator, OrchestratorOptions, PipelineSummary, ProcessedFile, StageReport, StageSelector,
};
pub use stage::{StageOutput, StageProcessor};
