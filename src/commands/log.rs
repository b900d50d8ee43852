use super::Settings;
use crate::io::{RealFileSystem, Reporter};
use crate::pipeline::DataLayout;
use crate::run_log::RunLogStore;
use anyhow::{Context, Result};

/// Print the newest `last` run-log entries, oldest first.
pub fn show_log(settings: &Settings, last: usize) -> Result<()> {
    let fs = RealFileSystem::new();
    let layout = DataLayout::new(&settings.data_root);
    let store = RunLogStore::new(
        &fs,
        layout.run_log_path(),
        settings.config.pipeline.log_capacity,
    );

    let log = store.load().context("Failed to read run log")?;

    let stdout = std::io::stdout();
    Reporter::new(stdout.lock())
        .plain(settings.plain)
        .write_run_log(log.last(last))?;
    Ok(())
}
