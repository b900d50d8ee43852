use anyhow::Result;
use pdoom_pipeline::cli::{self, Cli, Commands};
use pdoom_pipeline::commands::{self, Settings};
use pdoom_pipeline::pipeline::StageSelector;

// Main orchestrator function
fn main() -> Result<()> {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity);

    match cli.command() {
        Commands::Init { force } => {
            commands::init_config(&std::env::current_dir()?, force)?;
        }
        Commands::Run => {
            let settings = load_settings(&cli)?;
            commands::run_pipeline(&settings, StageSelector::from(cli.stage))?;
        }
        Commands::Ingest => {
            commands::run_ingest(&load_settings(&cli)?)?;
        }
        Commands::Log { last } => commands::show_log(&load_settings(&cli)?, last)?,
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let settings = Settings::from_cli(cli)?;
    if settings.plain {
        colored::control::set_override(false);
    }
    Ok(settings)
}
