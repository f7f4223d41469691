//! Raw TOML configuration data types
//!
//! These structs mirror the config file one to one. Conversions into the
//! application's types live next to each section.

mod cache;
mod components;
mod execution;
mod programs;
mod tools;

pub use cache::FileCacheConfig;
pub use components::{FileArtifactConfig, FileComponentsConfig, PROJECT_COMPONENT};
pub use execution::FileExecutionConfig;
pub use programs::FileProgramsConfig;
pub use tools::FileToolConfig;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub execution: FileExecutionConfig,
    pub cache: FileCacheConfig,
    pub tools: Vec<FileToolConfig>,
    pub programs: FileProgramsConfig,
    pub components: FileComponentsConfig,
}

impl FileConfig {
    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for tool in &self.tools {
            if !seen.insert(tool.id.as_str()) {
                return Err(ConfigError::invalid_tool(&tool.id, "defined more than once"));
            }
        }
        if self.execution.max_resolve_iterations == 0 {
            return Err(ConfigError::invalid_component(
                "execution.max_resolve_iterations",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
