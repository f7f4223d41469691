//! JSON output formatter for build results

use anvil_application::ResolutionReport;
use anvil_domain::{ExecutionRecord, Summary, Tool};
use serde_json::json;

use super::formatter::OutputFormatter;

/// Formats build results as pretty-printed JSON
pub struct JsonFormatter;

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, summary: &Summary) -> String {
        pretty(summary)
    }

    fn format_record(&self, record: &ExecutionRecord) -> String {
        pretty(record)
    }

    fn format_tools(&self, tools: &[Tool]) -> String {
        let tools: Vec<_> = tools
            .iter()
            .map(|tool| {
                json!({
                    "id": tool.identifier(),
                    "tags": tool.tags(),
                })
            })
            .collect();
        pretty(&tools)
    }

    fn format_resolution(&self, report: &ResolutionReport) -> String {
        pretty(&json!({
            "resolved": report.resolved,
            "iterations": report.iterations,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_domain::{ExecutionResult, ToolIdentifier, from_fn};
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_summary_round_trips_through_json() {
        let mut summary = Summary::new("build", Utc::now());
        summary.records.push(ExecutionRecord::from_result(
            "echo-fail",
            &ExecutionResult::failed("boom", Duration::ZERO),
        ));
        summary.skipped.push("package".to_string());

        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_summary(&summary)).unwrap();
        assert_eq!(value["title"], "build");
        assert_eq!(value["records"][0]["name"], "echo-fail");
        assert_eq!(value["records"][0]["exit_code"], 1);
        assert_eq!(value["skipped"][0], "package");
    }

    #[test]
    fn test_tools() {
        let tool = Tool::new(ToolIdentifier::parse("demo/x@1").unwrap(), from_fn(|_, _, _| 0))
            .with_tag("installed");
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_tools(&[tool])).unwrap();
        assert_eq!(value[0]["id"], "demo/x@1");
        assert_eq!(value[0]["tags"][0], "installed");
    }
}
