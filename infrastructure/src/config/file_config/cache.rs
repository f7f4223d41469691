//! Cache locations from TOML (`[cache]` section)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// Tool artifact cache; defaults to the user cache directory
    pub tools: Option<PathBuf>,
    /// Directory external components are resolved into
    pub components: PathBuf,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            tools: None,
            components: PathBuf::from("lib"),
        }
    }
}

impl FileCacheConfig {
    /// `$XDG_CACHE_HOME/anvil/tools` unless configured
    pub fn tool_cache_dir(&self) -> PathBuf {
        self.tools
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("anvil").join("tools")))
            .unwrap_or_else(|| PathBuf::from(".anvil").join("tools"))
    }
}
