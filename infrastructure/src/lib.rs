//! Infrastructure layer for anvil
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer (fetching, component catalogs) together with the tool
//! finders backed by the local system and configuration file loading.

pub mod catalog;
pub mod config;
pub mod fetch;
pub mod installer;
pub mod setup;
pub mod tools;

// Re-export commonly used types
pub use catalog::DirectoryCatalog;
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use fetch::{DefaultFetcher, DigestAlgorithm, ExpectedChecksum, FetchError};
pub use installer::{InstallMode, InstallerFinder, ToolInstaller};
pub use setup::{dependency_resolver, tool_finder};
pub use tools::{BuiltinFinder, BundleFinder, ProcessProvider, ProgramFinder};
