//! Tool installation into the local tool cache

pub mod finder;
pub mod tool_installer;

pub use finder::InstallerFinder;
pub use tool_installer::{INSTALLED_TAG, InstallMode, LazyInstallProvider, ToolInstaller};
