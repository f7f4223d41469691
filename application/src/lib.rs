//! Application layer for anvil
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, FailurePolicy};
pub use ports::{
    catalog::ComponentCatalog,
    fetcher::ArtifactFetcher,
    listener::{CompositeListener, LoggingListener, NoListener, PlanListener},
};
pub use use_cases::build_session::{BuildFailure, BuildSession};
pub use use_cases::execute_plan::PlanExecutor;
pub use use_cases::resolve_components::{DependencyResolver, ResolutionReport};
pub use use_cases::run_tool::ToolRunner;
pub use use_cases::tasks::{CreateDirectoriesTask, ResolveTask, RunToolTask};
