//! Pipeline configuration: `.pipeline.toml` discovery, parsing and validation.

mod core;
mod loader;

pub use self::core::{
    default_catalogue, DataConfig, PipelineConfig, SourcesConfig, StageConfig,
};
pub use loader::{
    directory_ancestors, find_config_file, load_config, load_config_from,
    parse_and_validate_config, LoadedConfig, CONFIG_FILE_NAME,
};
