//! Presentation layer for anvil
//!
//! This crate contains the CLI definition, build summary formatters and the
//! console plan listener.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::batch::parse_batch;
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, formatter_for};
pub use output::json::JsonFormatter;
pub use output::markdown::MarkdownFormatter;
pub use progress::reporter::ConsoleListener;
