//! Tool finders and providers backed by the local system
//!
//! | Finder | Tag | Tools |
//! |--------|-----|-------|
//! | [`BuiltinFinder`] | `builtin` | in-process `anvil/*` tools |
//! | [`ProgramFinder`] | `native` | executables on `PATH` or in listed directories |
//! | [`BundleFinder`] | `bundle` | executables inside an installed bundle directory |
//!
//! Installed tools are found through
//! [`InstallerFinder`](crate::installer::InstallerFinder).

pub mod builtin;
pub mod bundle;
pub mod process;
pub mod program;

pub use builtin::{BUILTIN_TAG, BuiltinFinder};
pub use bundle::{BUNDLE_TAG, BundleFinder};
pub use process::ProcessProvider;
pub use program::{NATIVE_TAG, ProgramFinder};
