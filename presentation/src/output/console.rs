//! Console output formatter for build results

use anvil_application::ResolutionReport;
use anvil_domain::{ExecutionRecord, Summary, Tool};
use colored::Colorize;

use super::formatter::{OutputFormatter, tag_list};

/// Formats build results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    fn status(record: &ExecutionRecord) -> String {
        if record.is_successful() {
            "ok".green().bold().to_string()
        } else {
            format!("FAILED ({})", record.exit_code).red().bold().to_string()
        }
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_summary(&self, summary: &Summary) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(&summary.title));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Started:".cyan().bold(),
            summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!(
            "{} {:.2?}\n",
            "Duration:".cyan().bold(),
            summary.duration
        ));

        output.push_str(&Self::section_header("Tasks"));
        for record in &summary.records {
            output.push_str(&format!(
                "  {:<12} {} {}\n",
                Self::status(record),
                record.name,
                format!("[{:.2?}]", record.duration).dimmed()
            ));
        }

        if !summary.skipped.is_empty() {
            output.push_str(&Self::section_header("Skipped"));
            for title in &summary.skipped {
                output.push_str(&format!("  {} {}\n", "-".dimmed(), title.dimmed()));
            }
        }

        let failures: Vec<&ExecutionRecord> = summary.failures().collect();
        if !failures.is_empty() {
            output.push_str(&Self::section_header("Failures"));
            for record in failures {
                output.push_str(&format!("\n{}\n", format!("── {} ──", record.name).red().bold()));
                let detail = if record.error.trim().is_empty() {
                    &record.output
                } else {
                    &record.error
                };
                output.push_str(&Self::indent(detail.trim_end(), "  "));
                output.push('\n');
            }
        }

        let verdict = if summary.is_successful() {
            "BUILD SUCCESSFUL".green().bold()
        } else {
            "BUILD FAILED".red().bold()
        };
        output.push_str(&format!(
            "\n{} ({} executed, {} skipped, {} tool calls)\n",
            verdict,
            summary.records.len(),
            summary.skipped.len(),
            summary.tool_history.len()
        ));
        output.push_str(&Self::footer());
        output
    }

    fn format_record(&self, record: &ExecutionRecord) -> String {
        let mut output = String::new();
        if !record.output.is_empty() {
            output.push_str(&record.output);
            if !record.output.ends_with('\n') {
                output.push('\n');
            }
        }
        if !record.error.is_empty() {
            output.push_str(&record.error.yellow().to_string());
            if !record.error.ends_with('\n') {
                output.push('\n');
            }
        }
        if !record.is_successful() {
            output.push_str(&format!(
                "{} {} exited with {}\n",
                "error:".red().bold(),
                record.name,
                record.exit_code
            ));
        }
        output
    }

    fn format_tools(&self, tools: &[Tool]) -> String {
        if tools.is_empty() {
            return format!("{}\n", "No tools found".dimmed());
        }
        let mut output = Self::section_header(&format!("Tools ({})", tools.len()));
        for tool in tools {
            output.push_str(&format!(
                "  {:<40} {}\n",
                tool.identifier().to_string().bold(),
                tag_list(tool).dimmed()
            ));
        }
        output
    }

    fn format_resolution(&self, report: &ResolutionReport) -> String {
        if report.resolved.is_empty() {
            return format!("{} nothing missing\n", "ok".green().bold());
        }
        let mut output = format!(
            "{} resolved {} component(s) in {} iteration(s)\n",
            "ok".green().bold(),
            report.resolved.len(),
            report.iterations
        );
        for name in &report.resolved {
            output.push_str(&format!("  + {}\n", name));
        }
        output
    }
}
