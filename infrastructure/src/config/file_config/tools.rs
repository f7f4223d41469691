//! Installed tool definitions from TOML (`[[tools]]` array)
//!
//! ```toml
//! [[tools]]
//! id = "google/google-java-format@1.22.0"
//! source = "https://github.com/google/google-java-format/releases/download/v1.22.0/google-java-format-1.22.0-all-deps.jar"
//! sha256 = "…"
//! launcher = ["java", "-jar"]
//! mode = "on-demand"
//! ```

use std::sync::Arc;

use anvil_application::ArtifactFetcher;
use anvil_domain::ToolIdentifier;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::fetch::{DigestAlgorithm, ExpectedChecksum, source_uri};
use crate::installer::{InstallMode, ToolInstaller};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileToolConfig {
    /// `[namespace/]nickname[@version]`
    pub id: String,
    /// URI or local path of the artifact
    pub source: String,
    #[serde(default)]
    pub mode: InstallMode,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub sha512: Option<String>,
    /// Expected size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub launcher: Vec<String>,
}

impl FileToolConfig {
    fn checksum(&self) -> Result<Option<ExpectedChecksum>, ConfigError> {
        match (&self.sha256, &self.sha512) {
            (Some(_), Some(_)) => Err(ConfigError::invalid_tool(
                &self.id,
                "set either sha256 or sha512, not both",
            )),
            (Some(digest), None) => Ok(Some(ExpectedChecksum::new(DigestAlgorithm::Sha256, digest))),
            (None, Some(digest)) => Ok(Some(ExpectedChecksum::new(DigestAlgorithm::Sha512, digest))),
            (None, None) => Ok(None),
        }
    }

    pub fn to_installer(&self, fetcher: Arc<dyn ArtifactFetcher>) -> Result<ToolInstaller, ConfigError> {
        let identifier =
            ToolIdentifier::parse(&self.id).map_err(|e| ConfigError::invalid_tool(&self.id, e))?;
        let source = source_uri(&self.source).map_err(|e| ConfigError::invalid_tool(&self.id, e))?;

        let mut installer = ToolInstaller::new(identifier, source, fetcher)
            .with_mode(self.mode)
            .with_launcher(self.launcher.iter().cloned());
        if let Some(checksum) = self.checksum()? {
            installer = installer.with_checksum(checksum);
        }
        if let Some(size) = self.size {
            installer = installer.with_size(size);
        }
        Ok(installer)
    }
}
