//! Native programs found on disk

use std::fs;
use std::path::{Path, PathBuf};

use anvil_domain::{Tool, ToolFinder, ToolIdentifier};
use tracing::debug;

use super::process::ProcessProvider;

pub const NATIVE_TAG: &str = "native";

/// Finds executables in explicit directories, then on `PATH`
///
/// Only bare names are looked up; `ns/name` and `name@version` belong to
/// other finders. [`tools`](ToolFinder::tools) lists the explicit
/// directories only.
#[derive(Debug, Clone)]
pub struct ProgramFinder {
    directories: Vec<PathBuf>,
    search_path: bool,
}

impl ProgramFinder {
    /// Finder over `PATH` only
    pub fn new() -> Self {
        Self {
            directories: Vec::new(),
            search_path: true,
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directories.push(directory.into());
        self
    }

    pub fn with_search_path(mut self, enabled: bool) -> Self {
        self.search_path = enabled;
        self
    }

    fn lookup(&self, name: &str) -> Option<PathBuf> {
        self.directories
            .iter()
            .find_map(|dir| which::which_in(name, Some(dir), dir).ok())
            .or_else(|| {
                self.search_path
                    .then(|| which::which(name).ok())
                    .flatten()
            })
    }
}

impl Default for ProgramFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolFinder for ProgramFinder {
    fn find(&self, name: &str) -> Option<Tool> {
        if name.contains(['/', '\\', '@']) {
            return None;
        }
        let path = self.lookup(name)?;
        debug!(tool = name, path = %path.display(), "Found native program");
        program_tool(name, path)
    }

    fn tools(&self) -> Vec<Tool> {
        self.directories
            .iter()
            .flat_map(|dir| executables(dir))
            .filter_map(|path| {
                let name = path.file_stem()?.to_str()?.to_string();
                program_tool(&name, path)
            })
            .collect()
    }
}

fn program_tool(name: &str, path: PathBuf) -> Option<Tool> {
    let identifier = ToolIdentifier::new("", name, None).ok()?;
    Some(Tool::new(identifier, ProcessProvider::new(path)).with_tag(NATIVE_TAG))
}

/// Executable regular files directly inside `dir`, sorted by path
pub(crate) fn executables(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| is_executable(path))
        .collect();
    found.sort();
    found
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ["exe", "bat", "cmd"].contains(&e.to_ascii_lowercase().as_str()))
}
