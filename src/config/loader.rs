use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::PipelineConfig;
use crate::errors::PipelineError;

pub const CONFIG_FILE_NAME: &str = ".pipeline.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// A configuration together with the file it came from, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedConfig {
    pub config: PipelineConfig,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// The data root. A relative root is taken relative to the directory of
    /// the config file it was read from.
    pub fn data_root(&self) -> PathBuf {
        let root = &self.config.data.root;
        match self.path.as_deref().and_then(Path::parent) {
            Some(dir) if root.is_relative() => dir.join(root),
            _ => root.clone(),
        }
    }
}

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string.
pub fn parse_and_validate_config(contents: &str) -> Result<PipelineConfig, PipelineError> {
    let config = toml::from_str::<PipelineConfig>(contents).map_err(|e| {
        PipelineError::config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
    })?;
    config.validate()?;
    Ok(config)
}

fn load_from_path(path: &Path) -> Result<PipelineConfig, PipelineError> {
    let contents = read_config_file(path).map_err(|e| {
        PipelineError::config_with_path(format!("Failed to read config: {}", e), path)
    })?;

    parse_and_validate_config(&contents).map_err(|e| match e {
        PipelineError::Config { message, .. } => PipelineError::config_with_path(message, path),
        other => other,
    })
}

/// Directory ancestors of `start`, nearest first, up to `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.pipeline.toml` at or above `start`.
pub fn find_config_file(start: PathBuf) -> Option<PathBuf> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Load the pipeline configuration.
///
/// An explicit path must exist. Otherwise the nearest `.pipeline.toml` above
/// the current directory is used, falling back to defaults when none exists.
///
/// # Errors
///
/// Returns `PipelineError::Config` if the selected file cannot be read,
/// parsed, or validated.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, PipelineError> {
    if let Some(path) = explicit {
        let config = load_from_path(path)?;
        log::debug!("Loaded config from {}", path.display());
        return Ok(LoadedConfig {
            config,
            path: Some(path.to_path_buf()),
        });
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return Ok(LoadedConfig::default());
        }
    };

    load_config_from(current)
}

/// Like [`load_config`] without an explicit path, searching from `start`.
pub fn load_config_from(start: PathBuf) -> Result<LoadedConfig, PipelineError> {
    match find_config_file(start) {
        Some(path) => {
            let config = load_from_path(&path)?;
            log::debug!("Loaded config from {}", path.display());
            Ok(LoadedConfig {
                config,
                path: Some(path),
            })
        }
        None => {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(LoadedConfig::default())
        }
    }
}
