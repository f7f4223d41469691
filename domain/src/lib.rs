//! Domain layer for anvil
//!
//! This crate contains the core types of the build engine: how tools are
//! named, found and invoked, how external components are located, and how a
//! build plan is shaped. It performs no I/O of its own beyond what a
//! [`ToolProvider`] does when the application layer runs it.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! - **Tool Call**: immutable `name + arguments` request, derived with tweaks
//! - **Tool Finder**: name → tool resolution, composed as a chain
//!
//! ## Components
//!
//! - **Locator**: component name → fetchable URI
//! - **Missing names**: what present components require but nobody provides
//!
//! ## Plans
//!
//! - **Plan**: tree of leaf tasks and nested groups, sequential or parallel
//! - **Enablement level**: decides which nodes run in a given build

pub mod component;
pub mod core;
pub mod plan;
pub mod tool;

// Re-export commonly used types
pub use component::{
    ArtifactCoordinates, CachingLocator, ComponentDescriptor, ComponentLocation, Locator,
    LocatorChain, MAVEN_CENTRAL, MappedLocator, PrefixRule, RepositoryLocator, Stability,
    missing_names,
};
pub use core::error::DomainError;
pub use plan::{
    EnablementLevel, ExecutionResult, LeafTask, LevelSet, Node, Plan, Summary, Task,
};
pub use tool::{
    ChainFinder, ExecutionHistory, ExecutionRecord, FnProvider, PositionalTweak, Tool, ToolCall,
    ToolFinder, ToolIdentifier, ToolProvider, ToolTable, Tweak, apply_positional_tweaks, compose,
    from_fn, tweak,
};
