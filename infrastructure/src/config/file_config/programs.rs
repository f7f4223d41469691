//! Native program lookup from TOML (`[programs]` section)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::tools::{BundleFinder, ProgramFinder};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProgramsConfig {
    /// Searched in order, before `PATH`
    pub directories: Vec<PathBuf>,
    pub search_path: bool,
    /// Bundle directories whose executables become `<bundle>/<name>` tools
    pub bundles: Vec<PathBuf>,
}

impl Default for FileProgramsConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            search_path: true,
            bundles: Vec::new(),
        }
    }
}

impl FileProgramsConfig {
    pub fn to_finder(&self) -> ProgramFinder {
        self.directories
            .iter()
            .fold(ProgramFinder::new(), |finder, dir| finder.with_directory(dir))
            .with_search_path(self.search_path)
    }

    pub fn to_bundle_finders(&self) -> Vec<BundleFinder> {
        self.bundles.iter().map(BundleFinder::new).collect()
    }
}
