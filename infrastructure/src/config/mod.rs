//! Configuration file loading for anvil
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ANVIL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./anvil.toml` or `./.anvil.toml`
//! 4. Global: `$XDG_CONFIG_HOME/anvil/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    FileArtifactConfig, FileCacheConfig, FileComponentsConfig, FileConfig, FileExecutionConfig,
    FileProgramsConfig, FileToolConfig, PROJECT_COMPONENT,
};
pub use loader::ConfigLoader;
