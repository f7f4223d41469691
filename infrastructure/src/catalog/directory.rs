//! Component catalog over a plain directory
//!
//! Every `<name>.<extension>` file is a component. What it requires is read
//! from an optional `<name>.toml` descriptor next to it:
//!
//! ```toml
//! requires = ["slf4j-api", "jackson-core"]
//! ```
//!
//! An artifact without a descriptor requires nothing.

use std::fs;
use std::io;
use std::path::Path;

use anvil_application::ComponentCatalog;
use anvil_domain::{ComponentDescriptor, DomainError};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_EXTENSION: &str = "jar";
const DESCRIPTOR_EXTENSION: &str = "toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DescriptorFile {
    name: Option<String>,
    requires: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    extension: String,
}

impl DirectoryCatalog {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    fn describe(&self, artifact: &Path, stem: &str) -> Result<ComponentDescriptor, DomainError> {
        let descriptor_path = artifact.with_extension(DESCRIPTOR_EXTENSION);
        let file = match fs::read_to_string(&descriptor_path) {
            Ok(text) => toml::from_str::<DescriptorFile>(&text)
                .map_err(|e| DomainError::catalog_unreadable(&descriptor_path, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DescriptorFile::default(),
            Err(e) => return Err(DomainError::catalog_unreadable(&descriptor_path, e)),
        };
        let name = file.name.unwrap_or_else(|| stem.to_string());
        Ok(ComponentDescriptor::new(name).requiring(file.requires))
    }
}

impl Default for DirectoryCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl ComponentCatalog for DirectoryCatalog {
    fn scan(&self, directory: &Path) -> Result<Vec<ComponentDescriptor>, DomainError> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DomainError::catalog_unreadable(directory, e)),
        };

        let mut artifacts: Vec<_> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == self.extension.as_str()))
            .collect();
        artifacts.sort();

        let mut descriptors = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            let Some(stem) = artifact.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            descriptors.push(self.describe(artifact, stem)?);
        }
        debug!(dir = %directory.display(), components = descriptors.len(), "Scanned components");
        Ok(descriptors)
    }

    fn artifact_extension(&self) -> &str {
        &self.extension
    }

    fn descriptor_extension(&self) -> Option<&str> {
        Some(DESCRIPTOR_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_is_empty() {
        let catalog = DirectoryCatalog::default();
        assert!(catalog.scan(Path::new("/nonexistent/anvil-lib")).unwrap().is_empty());
    }

    #[test]
    fn test_reads_descriptors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.jar"), b"").unwrap();
        fs::write(dir.path().join("app.toml"), "requires = [\"core\", \"log\"]\n").unwrap();
        fs::write(dir.path().join("core.jar"), b"").unwrap();
        fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let found = DirectoryCatalog::default().scan(dir.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["app", "core"]);
        assert_eq!(found[0].requires, BTreeSet::from(["core", "log"].map(String::from)));
        assert!(found[1].requires.is_empty());
    }

    #[test]
    fn test_descriptor_can_rename() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app-1.2.jar"), b"").unwrap();
        fs::write(dir.path().join("app-1.2.toml"), "name = \"app\"\n").unwrap();

        let found = DirectoryCatalog::default().scan(dir.path()).unwrap();
        assert_eq!(found[0].name, "app");
    }

    #[test]
    fn test_malformed_descriptor() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.jar"), b"").unwrap();
        fs::write(dir.path().join("app.toml"), "requires = 3\n").unwrap();
        match DirectoryCatalog::default().scan(dir.path()) {
            Err(DomainError::CatalogUnreadable { path, .. }) => assert!(path.ends_with("app.toml")),
            other => panic!("expected CatalogUnreadable, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.zip"), b"").unwrap();
        fs::write(dir.path().join("b.jar"), b"").unwrap();
        let catalog = DirectoryCatalog::new("zip");
        assert_eq!(catalog.artifact_extension(), "zip");
        assert_eq!(catalog.scan(dir.path()).unwrap().len(), 1);
    }
}
