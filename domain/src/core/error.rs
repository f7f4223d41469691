//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Every failure that crosses a Tool, Runner or Resolver boundary is expressed
/// as one of these variants. Lower layers wrap their I/O and verification
/// errors before handing them upwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Fetch failed for {target}: {reason}")]
    FetchFailed { target: String, reason: String },

    #[error("Resolution stalled, still missing: {}", names.join(", "))]
    ResolutionStalled { names: Vec<String> },

    #[error("Tool `{name}` failed with exit code {exit_code}")]
    ToolExecutionFailed { name: String, exit_code: i32 },

    #[error("Unsupported enablement level: {0}")]
    UnsupportedEnablementLevel(String),

    #[error("Invalid tool identifier `{input}`: {reason}")]
    InvalidIdentifier { input: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot read component catalog {path}: {reason}")]
    CatalogUnreadable { path: String, reason: String },
}

impl DomainError {
    pub fn fetch_failed(target: impl ToString, reason: impl ToString) -> Self {
        DomainError::FetchFailed {
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_identifier(input: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidIdentifier {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn catalog_unreadable(path: &std::path::Path, reason: impl ToString) -> Self {
        DomainError::CatalogUnreadable {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Check if this error was caused by fetching or verifying an artifact
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, DomainError::FetchFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stalled_error_lists_names() {
        let error = DomainError::ResolutionStalled {
            names: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(error.to_string(), "Resolution stalled, still missing: a, b");
    }

    #[test]
    fn test_execution_failed_names_tool() {
        let error = DomainError::ToolExecutionFailed {
            name: "echo-fail".to_string(),
            exit_code: 1,
        };
        assert!(error.to_string().contains("echo-fail"));
        assert!(error.to_string().contains('1'));
    }

    #[test]
    fn test_is_fetch_failure() {
        assert!(DomainError::fetch_failed("foo.jar", "404").is_fetch_failure());
        assert!(!DomainError::ToolNotFound("javac".to_string()).is_fetch_failure());
    }

    #[test]
    fn test_catalog_unreadable_names_path() {
        let error = DomainError::catalog_unreadable(std::path::Path::new("lib/app.toml"), "bad toml");
        assert_eq!(error.to_string(), "Cannot read component catalog lib/app.toml: bad toml");
        assert!(!error.is_fetch_failure());
    }
}
