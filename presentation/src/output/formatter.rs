//! Output formatter trait

use anvil_application::ResolutionReport;
use anvil_domain::{ExecutionRecord, Summary, Tool};

use super::console::ConsoleFormatter;
use super::json::JsonFormatter;
use super::markdown::MarkdownFormatter;
use crate::cli::commands::OutputFormat;

/// Width of output excerpts in tables and one-line listings
pub const BRIEF_WIDTH: usize = 60;

/// Trait for formatting build results
pub trait OutputFormatter {
    /// Format the summary of a plan run
    fn format_summary(&self, summary: &Summary) -> String;

    /// Format a single tool invocation
    fn format_record(&self, record: &ExecutionRecord) -> String;

    /// Format the list of known tools
    fn format_tools(&self, tools: &[Tool]) -> String;

    /// Format the outcome of a component resolution
    fn format_resolution(&self, report: &ResolutionReport) -> String;
}

pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Tags joined for display
pub(crate) fn tag_list(tool: &Tool) -> String {
    tool.tags().iter().cloned().collect::<Vec<_>>().join(", ")
}
