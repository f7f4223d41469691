//! Tools bundled inside an installed artifact directory
//!
//! A bundle is a directory (typically unpacked into the tool cache) whose
//! `bin/` folder, or the directory itself when there is none, holds
//! executables. Every executable becomes a tool named
//! `<bundle>/<file stem>`; invocations run out-of-process with the bundle
//! root as working directory, so nothing a tool loads leaks into the build.
//!
//! Scanning is load-once: the result is kept together with the fingerprint
//! (path + modification time) of the scanned directory and only redone when
//! that fingerprint changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use anvil_domain::{Tool, ToolFinder, ToolIdentifier};
use tracing::{debug, warn};

use super::process::ProcessProvider;
use super::program::executables;

pub const BUNDLE_TAG: &str = "bundle";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    path: PathBuf,
    modified: Option<SystemTime>,
}

#[derive(Debug)]
struct Scan {
    fingerprint: Fingerprint,
    tools: Vec<Tool>,
}

#[derive(Debug)]
pub struct BundleFinder {
    root: PathBuf,
    name: String,
    scan: Mutex<Option<Scan>>,
    loads: AtomicUsize,
}

impl BundleFinder {
    /// Bundle rooted at `root`, named after its directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::named(name, root)
    }

    pub fn named(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
            scan: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// How many times the bundle has been scanned
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn scan_dir(&self) -> PathBuf {
        let bin = self.root.join("bin");
        if bin.is_dir() { bin } else { self.root.clone() }
    }

    fn fingerprint(&self) -> Fingerprint {
        let path = self.scan_dir();
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
        Fingerprint { path, modified }
    }

    fn load(&self, fingerprint: &Fingerprint) -> Vec<Tool> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let tools: Vec<Tool> = executables(&fingerprint.path)
            .into_iter()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?.to_string();
                match ToolIdentifier::new(self.name.clone(), stem, None) {
                    Ok(identifier) => {
                        let provider = ProcessProvider::new(path).in_dir(&self.root);
                        Some(Tool::new(identifier, provider).with_tag(BUNDLE_TAG))
                    }
                    Err(e) => {
                        warn!(bundle = %self.name, error = %e, "Skipping bundled executable");
                        None
                    }
                }
            })
            .collect();
        debug!(
            bundle = %self.name,
            dir = %fingerprint.path.display(),
            tools = tools.len(),
            "Scanned bundle"
        );
        tools
    }
}

impl ToolFinder for BundleFinder {
    fn tools(&self) -> Vec<Tool> {
        let fingerprint = self.fingerprint();
        let mut scan = self.scan.lock().unwrap_or_else(PoisonError::into_inner);
        match scan.as_ref() {
            Some(current) if current.fingerprint == fingerprint => current.tools.clone(),
            _ => {
                let tools = self.load(&fingerprint);
                *scan = Some(Scan {
                    fingerprint,
                    tools: tools.clone(),
                });
                tools
            }
        }
    }
}
