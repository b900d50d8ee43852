//! CLI command implementations.
//!
//! Available commands:
//! - **run**: execute pipeline stages (default)
//! - **ingest**: fetch metric sources into `raw/`
//! - **init**: write a default `.pipeline.toml`
//! - **log**: show recent run-log entries
//!
//! Commands return `anyhow::Result`; only configuration problems and run-log
//! failures surface as errors. Per-file failures are reported, not raised.

pub mod ingest;
pub mod init;
pub mod log;
pub mod run;

pub use ingest::run_ingest;
pub use init::init_config;
pub use log::show_log;
pub use run::run_pipeline;

use crate::cli::{plain_output, Cli};
use crate::config::{load_config, PipelineConfig};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Everything a command needs, resolved from the CLI and the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: PipelineConfig,
    pub data_root: PathBuf,
    pub dry_run: bool,
    pub plain: bool,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let loaded = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
        let data_root = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| loaded.data_root());

        ::log::debug!("Using data root {}", data_root.display());

        Ok(Self {
            config: loaded.config,
            data_root,
            dry_run: cli.dry_run,
            plain: plain_output(cli.plain),
        })
    }
}
