//! CLI module for the pipeline
//!
//! This module provides the command-line interface, including:
//! - Argument parsing (`args`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod setup;

// Re-export commonly used types for convenience
pub use args::{Cli, Commands, StageArg};
pub use setup::{configure_thread_pool, get_worker_count, init_logging, plain_output};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
