//! External component settings from TOML (`[components]` section)
//!
//! ```toml
//! [components]
//! requires = ["org.junit.jupiter.api"]
//! system = ["java.base"]
//! repository = "https://repo.maven.apache.org/maven2"
//!
//! [components.locations]
//! "my.lib" = "https://example.org/my-lib-1.0.jar"
//!
//! [[components.artifacts]]
//! name = "org.apiguardian.api"
//! group = "org.apiguardian"
//! artifact = "apiguardian-api"
//! version = "1.1.2"
//!
//! [[components.rules]]
//! prefix = "org.junit.jupiter"
//! group = "org.junit.jupiter"
//! version = "5.10.2"
//! strip = "org."
//! ```

use std::collections::BTreeMap;

use anvil_domain::{
    ArtifactCoordinates, ComponentDescriptor, LocatorChain, MAVEN_CENTRAL, MappedLocator,
    PrefixRule, RepositoryLocator, Stability,
};
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_EXTENSION;
use crate::config::ConfigError;
use crate::fetch::source_uri;

/// Name under which the project's own requirements are declared
pub const PROJECT_COMPONENT: &str = "project";

/// Exact coordinates for one component name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileArtifactConfig {
    pub name: String,
    #[serde(flatten)]
    pub coordinates: ArtifactCoordinates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileComponentsConfig {
    /// Components the project itself requires
    pub requires: Vec<String>,
    /// Provided by the platform, never fetched
    pub system: Vec<String>,
    /// Artifact file extension
    pub extension: String,
    /// Repository root for `artifacts` and `rules`
    pub repository: String,
    /// Fixed URIs (or paths) per component name
    pub locations: BTreeMap<String, String>,
    pub artifacts: Vec<FileArtifactConfig>,
    pub rules: Vec<PrefixRule>,
}

impl Default for FileComponentsConfig {
    fn default() -> Self {
        Self {
            requires: Vec::new(),
            system: Vec::new(),
            extension: DEFAULT_EXTENSION.to_string(),
            repository: MAVEN_CENTRAL.to_string(),
            locations: BTreeMap::new(),
            artifacts: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl FileComponentsConfig {
    /// The project's requirements as a declared component
    pub fn declared(&self) -> ComponentDescriptor {
        ComponentDescriptor::new(PROJECT_COMPONENT).requiring(self.requires.iter().cloned())
    }

    /// Fixed locations first, then the repository
    pub fn to_locator(&self) -> Result<LocatorChain, ConfigError> {
        let mut mapped = MappedLocator::new(Stability::Stable);
        for (name, location) in &self.locations {
            let uri = source_uri(location).map_err(|e| ConfigError::invalid_component(name, e))?;
            mapped = mapped.with(name, uri);
        }

        let root = url::Url::parse(&self.repository)
            .map_err(|e| ConfigError::invalid_component("repository", e))?;
        let repository = self
            .artifacts
            .iter()
            .fold(RepositoryLocator::new(root), |locator, artifact| {
                locator.with_exact(&artifact.name, artifact.coordinates.clone())
            });
        let repository = self
            .rules
            .iter()
            .cloned()
            .fold(repository, |locator, rule| locator.with_rule(rule));

        Ok(LocatorChain::new().with(mapped).with(repository))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_domain::Locator;

    const EXAMPLE: &str = r#"
requires = ["org.junit.jupiter.api"]
system = ["java.base"]

[locations]
"my.lib" = "https://example.org/my-lib-1.0.jar"

[[artifacts]]
name = "org.apiguardian.api"
group = "org.apiguardian"
artifact = "apiguardian-api"
version = "1.1.2"

[[rules]]
prefix = "org.junit.jupiter"
group = "org.junit.jupiter"
version = "5.10.2"
strip = "org."
"#;

    #[test]
    fn test_locator_order_and_stability() {
        let config: FileComponentsConfig = toml::from_str(EXAMPLE).unwrap();
        let locator = config.to_locator().unwrap();

        let mapped = locator.locate("my.lib").unwrap();
        assert_eq!(mapped.uri.as_str(), "https://example.org/my-lib-1.0.jar");
        assert_eq!(mapped.stability, Stability::Stable);

        let exact = locator.locate("org.apiguardian.api").unwrap();
        assert_eq!(exact.stability, Stability::Stable);
        assert!(exact.uri.as_str().ends_with(
            "/org/apiguardian/apiguardian-api/1.1.2/apiguardian-api-1.1.2.jar"
        ));

        let ruled = locator.locate("org.junit.jupiter.api").unwrap();
        assert_eq!(ruled.stability, Stability::Dynamic);

        assert!(locator.locate("com.unknown").is_none());
    }

    #[test]
    fn test_declared_requirements() {
        let config: FileComponentsConfig = toml::from_str(EXAMPLE).unwrap();
        let declared = config.declared();
        assert_eq!(declared.name, PROJECT_COMPONENT);
        assert!(declared.requires.contains("org.junit.jupiter.api"));
        assert_eq!(config.extension, "jar");
    }

    #[test]
    fn test_bad_repository() {
        let config = FileComponentsConfig {
            repository: "not a uri".to_string(),
            ..Default::default()
        };
        assert!(config.to_locator().is_err());
    }
}
