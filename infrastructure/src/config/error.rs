//! Configuration errors

use anvil_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid tool `{id}`: {reason}")]
    InvalidTool { id: String, reason: String },

    #[error("Invalid component setting `{key}`: {reason}")]
    InvalidComponent { key: String, reason: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ConfigError {
    pub fn invalid_tool(id: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidTool {
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_component(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidComponent {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
