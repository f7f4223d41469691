//! Component catalogs

pub mod directory;

pub use directory::{DEFAULT_EXTENSION, DirectoryCatalog};
