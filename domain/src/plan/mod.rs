//! Build plans
//!
//! ```text
//! Plan "build" (sequential)
//! ├── Leaf  "resolve"            level: always
//! ├── Plan  "compile" (parallel)
//! │   ├── Leaf "javac main"
//! │   └── Leaf "javac test"
//! └── Leaf  "javadoc"            level: docs
//! ```
//!
//! Levels are validated up front against a [`LevelSet`]; the executor in the
//! application layer walks the tree and collects a [`Summary`].

pub mod entities;
pub mod level;
pub mod summary;

pub use entities::{ExecutionResult, LeafTask, Node, Plan, Task};
pub use level::{EnablementLevel, LevelSet};
pub use summary::Summary;
