//! Tool domain module
//!
//! How a build names, finds and invokes external tools.
//!
//! ```text
//! ┌──────────────┐  find(name)  ┌──────────────┐  run(out, err, args)  ┌─────────────────┐
//! │ ToolCall     │─────────────▶│ ToolFinder   │──────────────────────▶│ ExecutionRecord │
//! │ name + args  │              │ → Tool       │   (ToolProvider)      │ → History       │
//! └──────────────┘              └──────────────┘                       └─────────────────┘
//! ```
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`ToolCall`] | Immutable `(name, arguments)` request, derived with tweaks |
//! | [`ToolIdentifier`] | `namespace/nickname@version` naming of a tool |
//! | [`Tool`] | Identifier + tags + shared [`ToolProvider`] |
//! | [`ToolFinder`] | Name → tool lookup, composed with [`compose`] |
//! | [`ExecutionRecord`] | Outcome of one invocation |
//! | [`ExecutionHistory`] | Append-only log scoped to one build |
//!
//! Concrete finders that touch the file system or spawn processes live in
//! the infrastructure crate.

pub mod call;
pub mod entities;
pub mod finder;
pub mod provider;
pub mod value_objects;

pub use call::{PositionalTweak, ToolCall, Tweak, apply_positional_tweaks, tweak};
pub use entities::{Tool, ToolIdentifier};
pub use finder::{ChainFinder, ToolFinder, ToolTable, compose};
pub use provider::{FnProvider, ToolProvider, from_fn};
pub use value_objects::{ExecutionHistory, ExecutionRecord};
