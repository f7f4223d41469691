//! Tool domain entities

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::provider::ToolProvider;
use crate::core::error::DomainError;

/// Separator between namespace and nickname
pub const NAMESPACE_SEPARATOR: char = '/';

/// Separator between nickname and version
pub const VERSION_SEPARATOR: char = '@';

/// Nominal representation of a tool: `["namespace" "/"] "nickname" ["@" "version"]`
///
/// Example: `"jdk.compiler/javac@21"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolIdentifier {
    namespace: String,
    nickname: String,
    version: Option<String>,
}

impl ToolIdentifier {
    pub fn new(
        namespace: impl Into<String>,
        nickname: impl Into<String>,
        version: Option<String>,
    ) -> Result<Self, DomainError> {
        let namespace = namespace.into();
        let nickname = nickname.into();
        let input = match &version {
            Some(v) => format!("{}/{}@{}", namespace, nickname, v),
            None => format!("{}/{}", namespace, nickname),
        };

        if nickname.trim().is_empty() {
            return Err(DomainError::invalid_identifier(input, "nickname must not be blank"));
        }
        if nickname.contains(['/', '\\', VERSION_SEPARATOR]) {
            return Err(DomainError::invalid_identifier(
                input,
                "nickname must not contain / \\ @",
            ));
        }
        if namespace.starts_with(['/', '\\']) || namespace.ends_with(['/', '\\']) {
            return Err(DomainError::invalid_identifier(
                input,
                "namespace must not start or end with / \\",
            ));
        }
        if let Some(v) = &version
            && v.trim().is_empty()
        {
            return Err(DomainError::invalid_identifier(input, "version must not be blank"));
        }

        Ok(Self {
            namespace,
            nickname,
            version,
        })
    }

    /// Parse an identifier string
    ///
    /// Redundant `.` and empty path elements in the namespace are dropped;
    /// a trailing separator (nothing after the last `/`) is rejected.
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        let normalized = id.trim().replace('\\', "/");
        if normalized.is_empty() {
            return Err(DomainError::invalid_identifier(id, "identifier must not be blank"));
        }
        if normalized.ends_with(NAMESPACE_SEPARATOR) {
            return Err(DomainError::invalid_identifier(id, "missing nickname after separator"));
        }

        let mut elements: Vec<&str> = normalized
            .split(NAMESPACE_SEPARATOR)
            .filter(|e| !e.is_empty() && *e != ".")
            .collect();
        let file = elements
            .pop()
            .ok_or_else(|| DomainError::invalid_identifier(id, "only redundant elements"))?;
        let namespace = elements.join("/");

        match file.split_once(VERSION_SEPARATOR) {
            Some((nickname, version)) => {
                Self::new(namespace, nickname, Some(version.to_string()))
            }
            None => Self::new(namespace, file, None),
        }
        .map_err(|e| match e {
            DomainError::InvalidIdentifier { reason, .. } => {
                DomainError::invalid_identifier(id, reason)
            }
            other => other,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Check whether a user-supplied name refers to this tool
    ///
    /// Matches `nickname`, `namespace/nickname` and, for versioned
    /// identifiers, `nickname@version` and `namespace/nickname@version`.
    pub fn matches(&self, name: &str) -> bool {
        if self.nickname == name || self.to_namespace_and_nickname() == name {
            return true;
        }
        match &self.version {
            Some(_) => self.to_nickname_and_version() == name || self.to_string() == name,
            None => false,
        }
    }

    pub fn to_nickname_and_version(&self) -> String {
        match &self.version {
            Some(version) => format!("{}{}{}", self.nickname, VERSION_SEPARATOR, version),
            None => self.nickname.clone(),
        }
    }

    pub fn to_namespace_and_nickname(&self) -> String {
        if self.namespace.is_empty() {
            self.nickname.clone()
        } else {
            format!("{}{}{}", self.namespace, NAMESPACE_SEPARATOR, self.nickname)
        }
    }
}

impl fmt::Display for ToolIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.namespace.is_empty() {
            write!(f, "{}{}", self.namespace, NAMESPACE_SEPARATOR)?;
        }
        write!(f, "{}", self.to_nickname_and_version())
    }
}

impl FromStr for ToolIdentifier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ToolIdentifier {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ToolIdentifier> for String {
    fn from(identifier: ToolIdentifier) -> Self {
        identifier.to_string()
    }
}

/// A named, taggable handle around a runnable provider
///
/// Owned by whichever finder produced it; stateless beyond identifier and tags.
#[derive(Clone)]
pub struct Tool {
    identifier: ToolIdentifier,
    provider: Arc<dyn ToolProvider>,
    tags: BTreeSet<String>,
}

impl Tool {
    pub fn new(identifier: ToolIdentifier, provider: impl ToolProvider + 'static) -> Self {
        Self::from_arc(identifier, Arc::new(provider))
    }

    pub fn from_arc(identifier: ToolIdentifier, provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            identifier,
            provider,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn identifier(&self) -> &ToolIdentifier {
        &self.identifier
    }

    pub fn provider(&self) -> &Arc<dyn ToolProvider> {
        &self.provider
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn matches(&self, name: &str) -> bool {
        self.identifier.matches(name)
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("identifier", &self.identifier)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::provider::from_fn;

    #[test]
    fn test_identifier_matching() {
        let id = ToolIdentifier::parse("ns/nick").unwrap();
        assert_eq!(id.namespace(), "ns");
        assert_eq!(id.nickname(), "nick");
        assert!(id.matches("nick"));
        assert!(id.matches("ns/nick"));
        assert!(!id.matches("other"));
        assert!(!id.matches("other/nick@1"));
    }

    #[test]
    fn test_identifier_with_version() {
        let id = ToolIdentifier::parse("jdk.compiler/javac@21").unwrap();
        assert_eq!(id.version(), Some("21"));
        assert!(id.matches("javac"));
        assert!(id.matches("javac@21"));
        assert!(id.matches("jdk.compiler/javac"));
        assert!(id.matches("jdk.compiler/javac@21"));
        assert!(!id.matches("javac@22"));
        assert_eq!(id.to_string(), "jdk.compiler/javac@21");
    }

    #[test]
    fn test_identifier_nested_namespace() {
        let id = ToolIdentifier::parse("./org/example//tool").unwrap();
        assert_eq!(id.namespace(), "org/example");
        assert_eq!(id.nickname(), "tool");

        let bare = ToolIdentifier::parse("jar").unwrap();
        assert_eq!(bare.namespace(), "");
        assert_eq!(bare.to_string(), "jar");
    }

    #[test]
    fn test_malformed_identifiers_fail() {
        for input in ["", "   ", "ns/", "ns/@1", "nick@", "./.", "/"] {
            assert!(
                matches!(
                    ToolIdentifier::parse(input),
                    Err(DomainError::InvalidIdentifier { .. })
                ),
                "expected {:?} to be rejected",
                input
            );
        }
        assert!(ToolIdentifier::new("/ns", "nick", None).is_err());
        assert!(ToolIdentifier::new("ns", "ni/ck", None).is_err());
    }

    #[test]
    fn test_identifier_serde_as_string() {
        let id: ToolIdentifier = "ns/nick@1".parse().unwrap();
        let text: String = id.clone().into();
        assert_eq!(text, "ns/nick@1");
        assert_eq!(ToolIdentifier::try_from(text).unwrap(), id);
    }

    #[test]
    fn test_tool_tags_and_matching() {
        let tool = Tool::new(
            ToolIdentifier::parse("anvil/echo").unwrap(),
            from_fn(|_out, _err, _args| 0),
        )
        .with_tag("builtin");

        assert!(tool.has_tag("builtin"));
        assert!(!tool.has_tag("native"));
        assert!(tool.matches("echo"));
        assert!(tool.matches("anvil/echo"));
    }
}
