use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# Pipeline Configuration

[data]
# Root holding raw/, curated/, transformed/, servable/ and metadata/.
# Relative paths resolve against this file's directory.
root = "data"

[pipeline]
# Process files within a stage on a thread pool
parallel = false
# Worker threads when parallel (0 = one per core)
jobs = 0
# Run-log entries kept in metadata/pipeline_log.json (1 to 100)
log_capacity = 100
# Input paths to skip, relative to each stage directory
exclude = []

[sources]
remote_repo_base = "https://raw.githubusercontent.com/PipFoweraker/pdoom-data/main"
export_dir = "dashboard_exports"
timeout_secs = 10

# Metric source catalogue for `ingest`.
# data_source is kind:path with kind one of local, remote-repo (or pdoom_data), url.
# Placeholder metrics always use built-in sample data.

[[metrics]]
id = "safety_researchers"
title = "Safety Researchers"
data_source = "remote-repo:safety_researchers.json"
placeholder = true

[[metrics]]
id = "governance_researchers"
title = "Gov Researchers"
data_source = "remote-repo:governance_researchers.json"
placeholder = true

[[metrics]]
id = "capabilities_researchers"
title = "Capabilities Researchers"
data_source = "remote-repo:capabilities_researchers.json"
placeholder = true

[[metrics]]
id = "funding_overview"
title = "Funding Overview"
data_source = "remote-repo:funding_overview.json"
placeholder = true

[[metrics]]
id = "aisi_status"
title = "AI Safety Institutes"
data_source = "remote-repo:aisi_status.json"
placeholder = false

[[metrics]]
id = "governance_scores"
title = "Global Gov Score"
data_source = "remote-repo:governance_scores.json"
placeholder = true
"#;

/// Write the default configuration into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(config_path)
}
