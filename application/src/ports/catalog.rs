//! Component catalog port

use std::path::Path;

use anvil_domain::{ComponentDescriptor, DomainError};

/// Reads the descriptors of the components present in a directory
pub trait ComponentCatalog: Send + Sync {
    /// Describe every component artifact found in `directory`
    ///
    /// A directory that does not exist yet holds no components.
    fn scan(&self, directory: &Path) -> Result<Vec<ComponentDescriptor>, DomainError>;

    /// File extension of component artifacts, without the dot
    fn artifact_extension(&self) -> &str;

    /// Extension of the descriptor file kept next to each artifact
    ///
    /// Catalogs that read requirements from such a file return it here so the
    /// resolver fetches the descriptor along with the artifact.
    fn descriptor_extension(&self) -> Option<&str> {
        None
    }
}
