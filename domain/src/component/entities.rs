//! Component entities

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// How far a located URI can be trusted to stay the same
///
/// | Stability | Meaning | Cached by [`CachingLocator`](super::locator::CachingLocator) |
/// |-----------|---------|------|
/// | `Unknown` | No statement made | No |
/// | `Dynamic` | Computed, may change between lookups | No |
/// | `Stable` | Fixed for the lifetime of the process | Yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    #[default]
    Unknown,
    Dynamic,
    Stable,
}

impl Stability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stability::Unknown => "unknown",
            Stability::Dynamic => "dynamic",
            Stability::Stable => "stable",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a component's artifact can be fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLocation {
    pub name: String,
    pub uri: Url,
    #[serde(default)]
    pub stability: Stability,
    /// Explicit descriptor URI; when absent one is derived from `uri`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<Url>,
}

impl ComponentLocation {
    pub fn new(name: impl Into<String>, uri: Url) -> Self {
        Self {
            name: name.into(),
            uri,
            stability: Stability::Unknown,
            descriptor: None,
        }
    }

    pub fn with_stability(mut self, stability: Stability) -> Self {
        self.stability = stability;
        self
    }

    pub fn with_descriptor(mut self, descriptor: Url) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Where the component's descriptor is published
    ///
    /// The explicit descriptor if one was given, otherwise the artifact URI
    /// with its file extension replaced: `.../core-1.0.jar` becomes
    /// `.../core-1.0.<extension>`. `None` when the URI has no file name.
    pub fn descriptor_uri(&self, extension: &str) -> Option<Url> {
        if let Some(descriptor) = &self.descriptor {
            return Some(descriptor.clone());
        }
        let path = self.uri.path();
        let file_start = path.rfind('/').map_or(0, |i| i + 1);
        let file = &path[file_start..];
        if file.is_empty() {
            return None;
        }
        let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
        let derived = format!("{}{}.{}", &path[..file_start], stem, extension);

        let mut uri = self.uri.clone();
        uri.set_path(&derived);
        uri.set_query(None);
        uri.set_fragment(None);
        Some(uri)
    }
}

/// What a present component declares about itself
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub name: String,
    #[serde(default)]
    pub requires: BTreeSet<String>,
}

impl ComponentDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: BTreeSet::new(),
        }
    }

    pub fn requiring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(names.into_iter().map(Into::into));
        self
    }
}
