use crate::pipeline::StageSelector;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    /// Raw -> Curated
    Curate,
    /// Curated -> Transformed
    Transform,
    /// Transformed -> Servable
    Serve,
    /// All three stages, in order
    Full,
}

impl From<StageArg> for StageSelector {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::Curate => StageSelector::Curate,
            StageArg::Transform => StageSelector::Transform,
            StageArg::Serve => StageSelector::Serve,
            StageArg::Full => StageSelector::Full,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pdoom-pipeline")]
#[command(about = "Staged metric pipeline: raw -> curated -> transformed -> servable", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Stage to run
    #[arg(long, value_enum, default_value = "full", global = true)]
    pub stage: StageArg,

    /// Perform every read and validation step but write nothing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Configuration file (default: nearest .pipeline.toml)
    #[arg(long, global = true, env = "PIPELINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data root, overriding the configured one
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub plain: bool,

    /// Increase verbosity level (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run pipeline stages (the default)
    Run,

    /// Fetch configured metric sources into the raw directory
    Ingest,

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Show recent pipeline runs
    Log {
        /// Number of entries to show
        #[arg(long, default_value = "10")]
        last: usize,
    },
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
