//! Fetch and verification errors

use anvil_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unsupported URI scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
}

impl FetchError {
    /// Convert into the domain error for `target`
    pub fn for_target(self, target: impl ToString) -> DomainError {
        DomainError::fetch_failed(target, self)
    }

    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            FetchError::ChecksumMismatch { .. } | FetchError::SizeMismatch { .. }
        )
    }
}
