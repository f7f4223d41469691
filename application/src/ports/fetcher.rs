//! Artifact fetch port
//!
//! Copies the bytes behind a URI to a local path. Implementations live in the
//! infrastructure layer (file copies and HTTP downloads).

use std::path::Path;

use anvil_domain::DomainError;
use url::Url;

/// Fetch a byte stream from `source` into `target`
///
/// Implementations create missing parent directories and must never leave a
/// partially written file at `target`: write elsewhere, then rename. Every
/// failure is reported as [`DomainError::FetchFailed`].
///
/// The call blocks; async callers run it on a blocking worker thread.
pub trait ArtifactFetcher: Send + Sync {
    fn fetch(&self, source: &Url, target: &Path) -> Result<(), DomainError>;
}
