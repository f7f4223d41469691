//! Maven-layout repository locator
//!
//! Components hosted in a Maven 2 style repository are found at
//!
//! ```text
//! <root>/<group with dots as slashes>/<artifact>/<version>/<artifact>-<version>[-<classifier>].<ext>
//! ```
//!
//! [`RepositoryLocator`] knows exact coordinates for some names (answered as
//! `Stable`) and prefix rules that derive coordinates from the component name
//! (answered as `Dynamic`, since the rule may map to a different version later).

use serde::{Deserialize, Serialize};
use url::Url;

use super::entities::{ComponentLocation, Stability};
use super::locator::Locator;

pub const MAVEN_CENTRAL: &str = "https://repo.maven.apache.org/maven2";

/// `group:artifact:version[:classifier]` plus file extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactCoordinates {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    "jar".to_string()
}

impl ArtifactCoordinates {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            classifier: None,
            extension: default_extension(),
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// `artifact-version[-classifier].ext`
    pub fn file_name(&self) -> String {
        match self.classifier.as_deref().filter(|c| !c.is_empty()) {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact, self.version, classifier, self.extension
            ),
            None => format!("{}-{}.{}", self.artifact, self.version, self.extension),
        }
    }

    /// Resolve against a repository root
    pub fn to_uri(&self, root: &Url) -> Result<Url, url::ParseError> {
        let mut base = root.as_str().trim_end_matches('/').to_string();
        base.push('/');
        Url::parse(&base)?.join(&format!(
            "{}/{}/{}/{}",
            self.group.replace('.', "/"),
            self.artifact,
            self.version,
            self.file_name()
        ))
    }
}

/// Derives coordinates for every component name starting with `prefix`
///
/// The artifact id is the name with `strip` removed from its front and the
/// remaining dots replaced by dashes: with `strip = "org.junit."`, the name
/// `org.junit.jupiter.api` becomes artifact `jupiter-api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub group: String,
    pub version: String,
    #[serde(default)]
    pub strip: String,
    #[serde(default)]
    pub classifier: Option<String>,
}

impl PrefixRule {
    pub fn coordinates(&self, name: &str) -> Option<ArtifactCoordinates> {
        if !name.starts_with(&self.prefix) {
            return None;
        }
        let rest = name.strip_prefix(self.strip.as_str()).unwrap_or(name);
        if rest.is_empty() {
            return None;
        }
        let mut coordinates =
            ArtifactCoordinates::new(&self.group, rest.replace('.', "-"), &self.version);
        coordinates.classifier = self.classifier.clone();
        Some(coordinates)
    }
}

#[derive(Debug, Clone)]
pub struct RepositoryLocator {
    root: Url,
    exact: Vec<(String, ArtifactCoordinates)>,
    rules: Vec<PrefixRule>,
}

impl RepositoryLocator {
    pub fn new(root: Url) -> Self {
        Self {
            root,
            exact: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Locator rooted at Maven Central
    pub fn central() -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(MAVEN_CENTRAL)?))
    }

    pub fn with_exact(mut self, name: impl Into<String>, coordinates: ArtifactCoordinates) -> Self {
        self.exact.push((name.into(), coordinates));
        self
    }

    pub fn with_rule(mut self, rule: PrefixRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn root(&self) -> &Url {
        &self.root
    }
}

impl Locator for RepositoryLocator {
    fn locate(&self, name: &str) -> Option<ComponentLocation> {
        if let Some((_, coordinates)) = self.exact.iter().find(|(n, _)| n == name) {
            let uri = coordinates.to_uri(&self.root).ok()?;
            return Some(ComponentLocation::new(name, uri).with_stability(Stability::Stable));
        }
        self.rules
            .iter()
            .find_map(|rule| rule.coordinates(name))
            .and_then(|coordinates| coordinates.to_uri(&self.root).ok())
            .map(|uri| ComponentLocation::new(name, uri).with_stability(Stability::Dynamic))
    }
}
