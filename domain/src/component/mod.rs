//! External components: descriptors, locations and locators
//!
//! The dependency resolver repeatedly asks "which required names are not
//! present yet" ([`missing_names`]) and "where can I fetch this one"
//! ([`Locator`]). Locators are composed into a [`LocatorChain`].
//!
//! | Locator | Answers | Stability |
//! |---------|---------|-----------|
//! | [`MappedLocator`] | exact name → URI | configurable |
//! | [`RepositoryLocator`] | exact coordinates | `Stable` |
//! | [`RepositoryLocator`] | prefix rules | `Dynamic` |
//! | [`CachingLocator`] | whatever it wraps | caches `Stable` |

pub mod entities;
pub mod locator;
pub mod missing;
pub mod repository;

pub use entities::{ComponentDescriptor, ComponentLocation, Stability};
pub use locator::{CachingLocator, Locator, LocatorChain, MappedLocator};
pub use missing::missing_names;
pub use repository::{ArtifactCoordinates, MAVEN_CENTRAL, PrefixRule, RepositoryLocator};
