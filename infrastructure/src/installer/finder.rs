//! Finder over installed tools

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anvil_domain::{DomainError, Tool, ToolFinder};

use super::tool_installer::ToolInstaller;

/// Holds installers and the tools they produced
///
/// Adding an `Immediate` installer fetches its artifact right away, so a
/// broken source fails while the finder is being built.
#[derive(Debug)]
pub struct InstallerFinder {
    cache_dir: PathBuf,
    installed: Vec<(Arc<ToolInstaller>, Tool)>,
}

impl InstallerFinder {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            installed: Vec::new(),
        }
    }

    pub fn with(mut self, installer: ToolInstaller) -> Result<Self, DomainError> {
        let installer = Arc::new(installer);
        let tool = installer.install_into(&self.cache_dir)?;
        self.installed.push((installer, tool));
        Ok(self)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn installers(&self) -> impl Iterator<Item = &Arc<ToolInstaller>> {
        self.installed.iter().map(|(installer, _)| installer)
    }
}

impl ToolFinder for InstallerFinder {
    fn find(&self, name: &str) -> Option<Tool> {
        self.installed
            .iter()
            .find(|(_, tool)| tool.matches(name))
            .map(|(_, tool)| tool.clone())
    }

    fn tools(&self) -> Vec<Tool> {
        self.installed.iter().map(|(_, tool)| tool.clone()).collect()
    }
}
