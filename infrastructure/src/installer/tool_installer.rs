//! Fetch-once installation of tool artifacts
//!
//! ```text
//! install(cache_dir)
//!   ├── lock install state ── already installed and present? ─▶ path
//!   ├── cache_dir/<namespace>/<nickname>@<version>/<file> exists? ─▶ cache hit
//!   └── fetch into .install-XXXX/ ─▶ verify size + checksum ─▶ rename into place
//! ```
//!
//! The state lock is held across the fetch, so concurrent first uses of the
//! same installer wait for one download instead of racing it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anvil_application::ArtifactFetcher;
use anvil_domain::{DomainError, Tool, ToolIdentifier, ToolProvider};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::fetch::checksum::{self, ExpectedChecksum};
use crate::tools::ProcessProvider;

pub const INSTALLED_TAG: &str = "installed";

/// Namespace directory for identifiers without a namespace
const NO_NAMESPACE: &str = "_";

/// When the artifact is fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallMode {
    /// When the tool is created
    #[default]
    Immediate,
    /// On first use
    OnDemand,
}

/// Description of a tool artifact and how to install and launch it
pub struct ToolInstaller {
    identifier: ToolIdentifier,
    source: Url,
    mode: InstallMode,
    checksum: Option<ExpectedChecksum>,
    size: Option<u64>,
    launcher: Vec<String>,
    fetcher: Arc<dyn ArtifactFetcher>,
    installed: Mutex<Option<PathBuf>>,
}

impl ToolInstaller {
    pub fn new(identifier: ToolIdentifier, source: Url, fetcher: Arc<dyn ArtifactFetcher>) -> Self {
        Self {
            identifier,
            source,
            mode: InstallMode::default(),
            checksum: None,
            size: None,
            launcher: Vec::new(),
            fetcher,
            installed: Mutex::new(None),
        }
    }

    pub fn with_mode(mut self, mode: InstallMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_checksum(mut self, checksum: ExpectedChecksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Command prefix the artifact is handed to, e.g. `["java", "-jar"]`
    pub fn with_launcher<I, S>(mut self, launcher: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launcher = launcher.into_iter().map(Into::into).collect();
        self
    }

    pub fn identifier(&self) -> &ToolIdentifier {
        &self.identifier
    }

    pub fn source(&self) -> &Url {
        &self.source
    }

    pub fn mode(&self) -> InstallMode {
        self.mode
    }

    /// Where the artifact lives inside `cache_dir`
    pub fn artifact_path(&self, cache_dir: &Path) -> PathBuf {
        let namespace = match self.identifier.namespace() {
            "" => NO_NAMESPACE,
            ns => ns,
        };
        let file = self
            .source
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .unwrap_or(self.identifier.nickname());
        cache_dir
            .join(namespace)
            .join(self.identifier.to_nickname_and_version())
            .join(file)
    }

    /// Make the tool available from `cache_dir`
    ///
    /// `Immediate` installers fetch now; `OnDemand` ones return a tool that
    /// fetches on its first `prepare` or `run`.
    pub fn install_into(self: &Arc<Self>, cache_dir: &Path) -> Result<Tool, DomainError> {
        let provider: Arc<dyn ToolProvider> = match self.mode {
            InstallMode::Immediate => {
                let path = self.install(cache_dir)?;
                Arc::new(ProcessProvider::launched(&self.launcher, &path))
            }
            InstallMode::OnDemand => Arc::new(LazyInstallProvider {
                installer: Arc::clone(self),
                cache_dir: cache_dir.to_path_buf(),
            }),
        };
        Ok(Tool::from_arc(self.identifier.clone(), provider).with_tag(INSTALLED_TAG))
    }

    /// Install the artifact, fetching it at most once
    pub fn install(&self, cache_dir: &Path) -> Result<PathBuf, DomainError> {
        let mut installed = self.installed.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(path) = installed.as_ref()
            && path.is_file()
        {
            return Ok(path.clone());
        }

        let target = self.artifact_path(cache_dir);
        if target.is_file() {
            debug!(tool = %self.identifier, path = %target.display(), "Tool cache hit");
        } else {
            self.fetch_verified(&target)?;
            info!(tool = %self.identifier, path = %target.display(), "Installed tool");
        }
        *installed = Some(target.clone());
        Ok(target)
    }

    /// Delete the cached artifact so the next install fetches again
    pub fn invalidate(&self, cache_dir: &Path) -> Result<(), DomainError> {
        let mut installed = self.installed.lock().unwrap_or_else(PoisonError::into_inner);
        let target = self.artifact_path(cache_dir);
        if target.exists() {
            fs::remove_file(&target)
                .map_err(|e| DomainError::fetch_failed(target.display(), e))?;
        }
        *installed = None;
        Ok(())
    }

    fn fetch_verified(&self, target: &Path) -> Result<(), DomainError> {
        let failed = |reason: String| DomainError::fetch_failed(target.display(), reason);
        let parent = target
            .parent()
            .ok_or_else(|| failed("artifact path has no parent".to_string()))?;
        fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;

        // Removed on drop, taking any rejected download with it
        let staging = tempfile::Builder::new()
            .prefix(".install-")
            .tempdir_in(parent)
            .map_err(|e| failed(e.to_string()))?;
        let staged = staging.path().join("artifact");

        self.fetcher.fetch(&self.source, &staged)?;
        if let Some(size) = self.size {
            checksum::verify_size(&staged, size).map_err(|e| failed(e.to_string()))?;
        }
        if let Some(expected) = &self.checksum {
            checksum::verify(&staged, expected).map_err(|e| failed(e.to_string()))?;
        }
        if self.launcher.is_empty() {
            make_executable(&staged).map_err(|e| failed(e.to_string()))?;
        }
        fs::rename(&staged, target).map_err(|e| failed(e.to_string()))
    }
}

impl std::fmt::Debug for ToolInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInstaller")
            .field("identifier", &self.identifier)
            .field("source", &self.source.as_str())
            .field("mode", &self.mode)
            .field("launcher", &self.launcher)
            .finish()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Provider that installs its artifact on first use
pub struct LazyInstallProvider {
    installer: Arc<ToolInstaller>,
    cache_dir: PathBuf,
}

impl ToolProvider for LazyInstallProvider {
    fn run(&self, out: &mut dyn Write, err: &mut dyn Write, args: &[String]) -> i32 {
        match self.installer.install(&self.cache_dir) {
            Ok(path) => ProcessProvider::launched(&self.installer.launcher, &path).run(out, err, args),
            Err(e) => {
                let _ = writeln!(err, "{}", e);
                -1
            }
        }
    }

    fn prepare(&self) -> Result<(), DomainError> {
        self.installer.install(&self.cache_dir).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const SCRIPT: &str = "echo installed\n";

    /// Writes fixed bytes and counts how often it was asked to
    struct CountingFetcher {
        bytes: &'static str,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new(bytes: &'static str) -> Arc<Self> {
            Arc::new(Self {
                bytes,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ArtifactFetcher for CountingFetcher {
        fn fetch(&self, _source: &Url, target: &Path) -> Result<(), DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            fs::write(target, self.bytes).map_err(|e| DomainError::fetch_failed(target.display(), e))
        }
    }

    fn hello_installer(fetcher: &Arc<CountingFetcher>) -> ToolInstaller {
        let fetcher: Arc<dyn ArtifactFetcher> = fetcher.clone();
        ToolInstaller::new(
            ToolIdentifier::parse("demo/hello@1.0").unwrap(),
            Url::parse("https://example.org/tools/hello.sh").unwrap(),
            fetcher,
        )
        .with_launcher(["sh"])
    }

    #[test]
    fn test_artifact_path_layout() {
        let fetcher = CountingFetcher::new(SCRIPT);
        let path = hello_installer(&fetcher).artifact_path(Path::new("/cache"));
        assert_eq!(path, Path::new("/cache/demo/hello@1.0/hello.sh"));

        let bare = ToolInstaller::new(
            ToolIdentifier::parse("hello").unwrap(),
            Url::parse("https://example.org/").unwrap(),
            CountingFetcher::new(SCRIPT),
        );
        assert_eq!(bare.artifact_path(Path::new("/cache")), Path::new("/cache/_/hello/hello"));
    }

    #[test]
    fn test_install_fetches_once_then_hits_cache() {
        let cache = TempDir::new().unwrap();
        let fetcher = CountingFetcher::new(SCRIPT);
        let installer = hello_installer(&fetcher);

        let first = installer.install(cache.path()).unwrap();
        let second = installer.install(cache.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&first).unwrap(), SCRIPT);
        assert_eq!(fetcher.calls(), 1);

        // A new process finds the artifact already in the cache
        let other = CountingFetcher::new(SCRIPT);
        hello_installer(&other).install(cache.path()).unwrap();
        assert_eq!(other.calls(), 0);
    }

    #[test]
    fn test_concurrent_installs_fetch_once() {
        let cache = TempDir::new().unwrap();
        let fetcher = CountingFetcher::new(SCRIPT);
        let installer = Arc::new(hello_installer(&fetcher));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let installer = Arc::clone(&installer);
                let cache = cache.path();
                scope.spawn(move || installer.install(cache).unwrap());
            }
        });
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(fs::read_to_string(installer.artifact_path(cache.path())).unwrap(), SCRIPT);
    }

    #[test]
    fn test_separate_installers_race_to_one_artifact() {
        let cache = TempDir::new().unwrap();
        let fetcher = CountingFetcher::new(SCRIPT);

        let paths: Vec<PathBuf> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let installer = hello_installer(&fetcher);
                    let cache = cache.path();
                    scope.spawn(move || installer.install(cache).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let target = hello_installer(&fetcher).artifact_path(cache.path());
        assert!(paths.iter().all(|path| *path == target));
        assert_eq!(fs::read_to_string(&target).unwrap(), SCRIPT);

        let entries: Vec<String> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, ["hello.sh"]);
    }

    #[test]
    fn test_checksum_mismatch_promotes_nothing() {
        let cache = TempDir::new().unwrap();
        let fetcher = CountingFetcher::new(SCRIPT);
        let installer = hello_installer(&fetcher).with_checksum(ExpectedChecksum::sha256("00".repeat(32)));

        let error = installer.install(cache.path()).unwrap_err();
        assert!(error.is_fetch_failure());

        let target = installer.artifact_path(cache.path());
        assert!(!target.exists());
        let leftovers = fs::read_dir(target.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_size_mismatch_fails() {
        let cache = TempDir::new().unwrap();
        let fetcher = CountingFetcher::new(SCRIPT);
        let installer = hello_installer(&fetcher).with_size(1);
        assert!(installer.install(cache.path()).unwrap_err().is_fetch_failure());
    }

    #[test]
    fn test_matching_checksum_installs() {
        let cache = TempDir::new().unwrap();
        let digest = {
            let scratch = cache.path().join("scratch");
            fs::write(&scratch, SCRIPT).unwrap();
            checksum::digest_file(&scratch, checksum::DigestAlgorithm::Sha256).unwrap()
        };
        assert_eq!(digest.len(), 64);

        let fetcher = CountingFetcher::new(SCRIPT);
        let installer = hello_installer(&fetcher)
            .with_checksum(ExpectedChecksum::sha256(&digest))
            .with_size(SCRIPT.len() as u64);
        assert!(installer.install(cache.path()).unwrap().is_file());
    }

    #[test]
    fn test_invalidate_refetches() {
        let cache = TempDir::new().unwrap();
        let fetcher = CountingFetcher::new(SCRIPT);
        let installer = hello_installer(&fetcher);

        installer.install(cache.path()).unwrap();
        installer.invalidate(cache.path()).unwrap();
        assert!(!installer.artifact_path(cache.path()).exists());
        installer.install(cache.path()).unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_immediate_tool_runs_through_launcher() {
        let cache = TempDir::new().unwrap();
        let fetcher = CountingFetcher::new(SCRIPT);
        let installer = Arc::new(hello_installer(&fetcher));

        let tool = installer.install_into(cache.path()).unwrap();
        assert_eq!(fetcher.calls(), 1);
        assert!(tool.has_tag(INSTALLED_TAG));
        assert!(tool.matches("demo/hello@1.0"));

        let mut out = Vec::new();
        assert_eq!(tool.provider().run(&mut out, &mut Vec::new(), &[]), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "installed\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_on_demand_fetches_on_first_use() {
        let cache = TempDir::new().unwrap();
        let fetcher = CountingFetcher::new(SCRIPT);
        let installer = Arc::new(hello_installer(&fetcher).with_mode(InstallMode::OnDemand));

        let tool = installer.install_into(cache.path()).unwrap();
        assert_eq!(fetcher.calls(), 0);

        tool.provider().prepare().unwrap();
        assert_eq!(fetcher.calls(), 1);

        let mut out = Vec::new();
        assert_eq!(tool.provider().run(&mut out, &mut Vec::new(), &[]), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "installed\n");
        assert_eq!(fetcher.calls(), 1);
    }
}
