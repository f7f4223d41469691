//! Assembling finders and resolvers from a loaded [`FileConfig`]
//!
//! ```text
//! tool_finder:  builtin ─▶ installed [[tools]] ─▶ [programs] bundles ─▶ [programs] directories / PATH
//! resolver:     [components] locations ─▶ repository, cached; scanned from [cache] components
//!               (each fetch brings the `<name>.toml` descriptor along when one is published)
//! ```
//!
//! Both may block (immediate installs fetch, the HTTP client is blocking), so
//! async callers should run them on a blocking thread.

use std::sync::Arc;

use anvil_application::{ArtifactFetcher, DependencyResolver, ExecutionParams};
use anvil_domain::{CachingLocator, ChainFinder, ToolFinder, compose};
use tracing::debug;

use crate::catalog::DirectoryCatalog;
use crate::config::{ConfigError, FileConfig};
use crate::installer::InstallerFinder;
use crate::tools::BuiltinFinder;

pub fn tool_finder(
    config: &FileConfig,
    fetcher: Arc<dyn ArtifactFetcher>,
) -> Result<ChainFinder, ConfigError> {
    let mut installers = InstallerFinder::new(config.cache.tool_cache_dir());
    for tool in &config.tools {
        installers = installers.with(tool.to_installer(Arc::clone(&fetcher))?)?;
    }

    let mut finders: Vec<Arc<dyn ToolFinder>> =
        vec![Arc::new(BuiltinFinder::new()), Arc::new(installers)];
    for bundle in config.programs.to_bundle_finders() {
        finders.push(Arc::new(bundle));
    }
    finders.push(Arc::new(config.programs.to_finder()));

    debug!(finders = finders.len(), tools = config.tools.len(), "Tool finder chain ready");
    Ok(compose(finders))
}

pub fn dependency_resolver(
    config: &FileConfig,
    params: &ExecutionParams,
    fetcher: Arc<dyn ArtifactFetcher>,
) -> Result<DependencyResolver, ConfigError> {
    let components = &config.components;
    let locator = CachingLocator::new(Arc::new(components.to_locator()?));
    let catalog = DirectoryCatalog::new(&components.extension);

    Ok(DependencyResolver::new(
        &config.cache.components,
        Arc::new(locator),
        Arc::new(catalog),
        fetcher,
    )
    .with_system(components.system.iter().cloned())
    .with_declared(components.declared())
    .with_max_iterations(params.max_resolve_iterations))
}
