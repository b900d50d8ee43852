use super::Settings;
use crate::io::{RealFileSystem, Reporter};
use crate::pipeline::DataLayout;
use crate::sources::{IngestReport, Ingestor, SampleDataProvider, SourceAdapter};
use anyhow::{Context, Result};

/// Fetch every configured metric source into `raw/sources/`.
///
/// Local sources resolve relative to the data root.
pub fn run_ingest(settings: &Settings) -> Result<IngestReport> {
    let fs = RealFileSystem::new();
    let sources = &settings.config.sources;
    let adapter = SourceAdapter::new(&fs, &settings.data_root)
        .with_remote(sources.remote_repo())
        .with_timeout(sources.timeout());

    let report = Ingestor::new(
        &fs,
        DataLayout::new(&settings.data_root),
        &adapter,
        &SampleDataProvider,
    )
    .ingest(&settings.config.metrics, settings.dry_run)
    .context("Ingestion failed")?;

    let stdout = std::io::stdout();
    Reporter::new(stdout.lock())
        .plain(settings.plain)
        .write_ingest_report(&report)?;

    Ok(report)
}
