use super::Settings;
use crate::cli::{configure_thread_pool, get_worker_count};
use crate::io::{RealFileSystem, Reporter};
use crate::pipeline::{
    DataLayout, Orchestrator, OrchestratorOptions, PipelineSummary, StageSelector,
};
use anyhow::{Context, Result};

/// Run the selected stages against the real data tree and print the summary.
pub fn run_pipeline(settings: &Settings, selector: StageSelector) -> Result<PipelineSummary> {
    let stages = &settings.config.pipeline;
    if stages.parallel {
        configure_thread_pool(stages.jobs);
        log::info!(
            "Processing files in parallel on {} workers",
            get_worker_count(stages.jobs)
        );
    }

    let fs = RealFileSystem::new();
    let options = OrchestratorOptions {
        parallel: stages.parallel,
        exclude: stages.exclude.clone(),
        log_capacity: stages.log_capacity,
    };
    let summary = Orchestrator::new(&fs, DataLayout::new(&settings.data_root))
        .with_options(options)
        .run(selector, settings.dry_run)
        .with_context(|| format!("{} run failed", selector))?;

    let stdout = std::io::stdout();
    Reporter::new(stdout.lock())
        .plain(settings.plain)
        .write_summary(&summary)?;

    Ok(summary)
}
