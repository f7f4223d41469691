//! Markdown output formatter for build results

use anvil_application::ResolutionReport;
use anvil_domain::{ExecutionRecord, Summary, Tool};

use super::formatter::{BRIEF_WIDTH, OutputFormatter, tag_list};

/// Formats build results as Markdown tables
pub struct MarkdownFormatter;

/// Keep table cells on one line and their pipes literal
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

impl OutputFormatter for MarkdownFormatter {
    fn format_summary(&self, summary: &Summary) -> String {
        let verdict = if summary.is_successful() { "successful" } else { "failed" };
        let mut output = format!(
            "# {}\n\nStarted {} · {:.2?} · **{}**\n\n",
            summary.title,
            summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            summary.duration,
            verdict
        );

        output.push_str("| # | Task | Exit | Duration | Output |\n");
        output.push_str("|---|------|-----:|---------:|--------|\n");
        for (i, record) in summary.records.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {} | {:.2?} | {} |\n",
                i + 1,
                cell(&record.name),
                record.exit_code,
                record.duration,
                cell(&record.brief(BRIEF_WIDTH))
            ));
        }

        if !summary.skipped.is_empty() {
            output.push_str("\n## Skipped\n\n");
            for title in &summary.skipped {
                output.push_str(&format!("- {}\n", title));
            }
        }

        if !summary.tool_history.is_empty() {
            output.push_str("\n## Tool calls\n\n");
            output.push_str("| Command | Thread | Exit |\n");
            output.push_str("|---------|--------|-----:|\n");
            for record in &summary.tool_history {
                output.push_str(&format!(
                    "| `{}` | {} | {} |\n",
                    cell(&record.command_line()),
                    cell(&record.thread),
                    record.exit_code
                ));
            }
        }
        output
    }

    fn format_record(&self, record: &ExecutionRecord) -> String {
        let mut output = format!("## `{}`\n\nExit code: {}\n", record.command_line(), record.exit_code);
        if !record.output.is_empty() {
            output.push_str(&format!("\n```text\n{}\n```\n", record.output.trim_end()));
        }
        if !record.error.is_empty() {
            output.push_str(&format!("\nErrors:\n\n```text\n{}\n```\n", record.error.trim_end()));
        }
        output
    }

    fn format_tools(&self, tools: &[Tool]) -> String {
        let mut output = String::from("| Tool | Tags |\n|------|------|\n");
        for tool in tools {
            output.push_str(&format!("| `{}` | {} |\n", tool.identifier(), tag_list(tool)));
        }
        output
    }

    fn format_resolution(&self, report: &ResolutionReport) -> String {
        let mut output = format!(
            "Resolved {} component(s) in {} iteration(s)\n",
            report.resolved.len(),
            report.iterations
        );
        if !report.resolved.is_empty() {
            output.push('\n');
        }
        for name in &report.resolved {
            output.push_str(&format!("- `{}`\n", name));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_domain::ExecutionResult;
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_summary_table() {
        let mut summary = Summary::new("build", Utc::now());
        summary.records.push(ExecutionRecord::from_result(
            "echo a|b",
            &ExecutionResult::ok(Duration::ZERO).with_output("line one\nline two"),
        ));
        summary.records.push(ExecutionRecord::from_result(
            "echo-fail",
            &ExecutionResult::failed("boom", Duration::ZERO),
        ));

        let output = MarkdownFormatter.format_summary(&summary);
        assert!(output.starts_with("# build\n"));
        assert!(output.contains("**failed**"));
        assert!(output.contains("| 1 | echo a\\|b | 0 |"));
        assert!(output.contains("| line one |"));
        assert!(output.contains("| 2 | echo-fail | 1 |"));
        assert!(!output.contains("## Tool calls"));
    }
}
