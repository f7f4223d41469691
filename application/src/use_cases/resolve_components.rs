//! Resolve Components use case.
//!
//! Brings a component directory to a fixpoint: every name required by a
//! present (or declared) component is either present, declared, or provided
//! by the system.
//!
//! ```text
//! loop {
//!     present  = catalog.scan(dir)
//!     missing  = requires(present ∪ declared) − present − declared − system
//!     missing = ∅                     → done
//!     missing ∩ previous ≠ ∅          → ResolutionStalled
//!     iterations = cap                → ResolutionStalled
//!     locate + fetch every missing name (descriptor, then artifact) in parallel, join all
//! }
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anvil_domain::{ComponentDescriptor, ComponentLocation, DomainError, Locator, missing_names};
use futures::future::join_all;
use tracing::{debug, info};
use url::Url;

use crate::ports::catalog::ComponentCatalog;
use crate::ports::fetcher::ArtifactFetcher;

/// Outcome of a successful [`DependencyResolver::resolve_missing`] run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Names fetched during this run
    pub resolved: BTreeSet<String>,
    /// Number of fetch rounds
    pub iterations: usize,
}

/// Use case for fetching the external components a build needs.
pub struct DependencyResolver {
    directory: PathBuf,
    locator: Arc<dyn Locator>,
    catalog: Arc<dyn ComponentCatalog>,
    fetcher: Arc<dyn ArtifactFetcher>,
    system: BTreeSet<String>,
    declared: Vec<ComponentDescriptor>,
    max_iterations: usize,
}

impl DependencyResolver {
    pub fn new(
        directory: impl Into<PathBuf>,
        locator: Arc<dyn Locator>,
        catalog: Arc<dyn ComponentCatalog>,
        fetcher: Arc<dyn ArtifactFetcher>,
    ) -> Self {
        Self {
            directory: directory.into(),
            locator,
            catalog,
            fetcher,
            system: BTreeSet::new(),
            declared: Vec::new(),
            max_iterations: 64,
        }
    }

    /// Names provided by the platform, never fetched
    pub fn with_system<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.system.extend(names.into_iter().map(Into::into));
        self
    }

    /// Components owned by the project itself
    pub fn with_declared(mut self, descriptor: ComponentDescriptor) -> Self {
        self.declared.push(descriptor);
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Names currently required but not provided
    pub fn missing(&self) -> Result<BTreeSet<String>, DomainError> {
        let present = self.catalog.scan(&self.directory)?;
        Ok(missing_names(&present, &self.declared, &self.system))
    }

    /// Make sure a single component is present.
    ///
    /// Returns `true` if it had to be fetched, `false` if it was already there.
    pub async fn resolve_component(&self, name: &str) -> Result<bool, DomainError> {
        let present = self.catalog.scan(&self.directory)?;
        if present.iter().any(|descriptor| descriptor.name == name) {
            debug!(component = %name, "Component already present");
            return Ok(false);
        }
        let location = self.locate(name)?;
        self.fetch(location).await?;
        Ok(true)
    }

    /// Fetch missing components until nothing is missing.
    pub async fn resolve_missing(&self) -> Result<ResolutionReport, DomainError> {
        let mut report = ResolutionReport::default();
        let mut previous = BTreeSet::new();

        loop {
            let missing = self.missing()?;
            if missing.is_empty() {
                info!(
                    resolved = report.resolved.len(),
                    iterations = report.iterations,
                    "Components resolved"
                );
                return Ok(report);
            }

            let repeated: Vec<String> = missing.intersection(&previous).cloned().collect();
            if !repeated.is_empty() {
                return Err(DomainError::ResolutionStalled { names: repeated });
            }
            if report.iterations >= self.max_iterations {
                return Err(DomainError::ResolutionStalled {
                    names: missing.into_iter().collect(),
                });
            }
            report.iterations += 1;
            debug!(iteration = report.iterations, missing = ?missing, "Resolving missing components");

            let locations = missing
                .iter()
                .map(|name| self.locate(name))
                .collect::<Result<Vec<_>, _>>()?;
            for result in join_all(locations.into_iter().map(|location| self.fetch(location))).await {
                result?;
            }

            report.resolved.extend(missing.iter().cloned());
            previous = missing;
        }
    }

    fn locate(&self, name: &str) -> Result<ComponentLocation, DomainError> {
        self.locator
            .locate(name)
            .ok_or_else(|| DomainError::fetch_failed(name, "no locator knows this component"))
    }

    /// Fetch the component's descriptor, then its artifact
    ///
    /// A derived descriptor URI is optional: most components publish none. An
    /// explicit one must be fetchable.
    async fn fetch(&self, location: ComponentLocation) -> Result<(), DomainError> {
        info!(component = %location.name, uri = %location.uri, "Fetching component");

        if let Some(extension) = self.catalog.descriptor_extension()
            && let Some(uri) = location.descriptor_uri(extension)
        {
            let target = self.directory.join(format!("{}.{}", location.name, extension));
            match self.fetch_blocking(uri, target, &location.name).await {
                Ok(()) => debug!(component = %location.name, "Fetched component descriptor"),
                Err(e) if location.descriptor.is_none() => {
                    debug!(component = %location.name, error = %e, "No component descriptor published")
                }
                Err(e) => return Err(e),
            }
        }

        let target = self.directory.join(format!(
            "{}.{}",
            location.name,
            self.catalog.artifact_extension()
        ));
        self.fetch_blocking(location.uri, target, &location.name).await
    }

    async fn fetch_blocking(&self, uri: Url, target: PathBuf, name: &str) -> Result<(), DomainError> {
        let fetcher = Arc::clone(&self.fetcher);
        tokio::task::spawn_blocking(move || fetcher.fetch(&uri, &target))
            .await
            .map_err(|e| DomainError::fetch_failed(name, e))?
    }
}
