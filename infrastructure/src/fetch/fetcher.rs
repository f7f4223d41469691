//! Default artifact fetcher: `file:` URIs and `http(s):` downloads

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::time::Duration;

use anvil_application::ArtifactFetcher;
use anvil_domain::DomainError;
use tracing::debug;
use url::Url;

use super::error::FetchError;

/// Default timeout for a single download (5 minutes)
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Copies local files and downloads remote ones
///
/// Bytes are written to a temporary file next to the target and renamed into
/// place once complete, so a reader never observes a partial artifact.
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    timeout: Duration,
    user_agent: String,
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("anvil/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn copy_to(&self, source: &Url, file: &mut File) -> Result<u64, FetchError> {
        match source.scheme() {
            "file" => {
                let path = source
                    .to_file_path()
                    .map_err(|_| FetchError::InvalidSource(source.to_string()))?;
                let mut input = File::open(path)?;
                Ok(io::copy(&mut input, file)?)
            }
            "http" | "https" => {
                let client = reqwest::blocking::Client::builder()
                    .timeout(self.timeout)
                    .user_agent(&self.user_agent)
                    .build()?;
                let mut response = client.get(source.clone()).send()?.error_for_status()?;
                Ok(response.copy_to(file)?)
            }
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }

    fn fetch_inner(&self, source: &Url, target: &Path) -> Result<(), FetchError> {
        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let mut temp = tempfile::Builder::new()
            .prefix(".fetch-")
            .suffix(".part")
            .tempfile_in(parent)?;
        let bytes = self.copy_to(source, temp.as_file_mut())?;
        temp.as_file().sync_all()?;
        temp.persist(target).map_err(|e| e.error)?;

        debug!(source = %source, target = %target.display(), bytes, "Fetched");
        Ok(())
    }
}

impl ArtifactFetcher for DefaultFetcher {
    fn fetch(&self, source: &Url, target: &Path) -> Result<(), DomainError> {
        self.fetch_inner(source, target)
            .map_err(|e| e.for_target(source))
    }
}
