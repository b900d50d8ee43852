//! Metric sources upstream of the stage chain.
//!
//! A [`SourceDescriptor`] names where a metric's data lives; a [`DataSource`]
//! resolves it to bytes; the [`Ingestor`] turns the result (or a sample
//! fallback) into raw metric files for the curate stage.

pub mod adapter;
pub mod defaults;
pub mod descriptor;
pub mod ingest;

pub use adapter::{DataSource, FetchError, RemoteRepo, SourceAdapter};
pub use defaults::{DefaultValueProvider, KnownMetric, SampleDataProvider};
pub use descriptor::{DescriptorError, SourceDescriptor, SourceKind};
pub use ingest::{
    IngestReport, IngestedMetric, Ingestor, ManifestEntry, MetricSource, PayloadOrigin,
    SourceManifest,
};
