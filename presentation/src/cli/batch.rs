//! Batch files: one tool call per line

use anvil_domain::{DomainError, ToolCall};

/// Parse a batch file
///
/// Blank lines and lines starting with `#` are ignored. Every other line is
/// `tool arg...`, split on whitespace.
pub fn parse_batch(text: &str) -> Result<Vec<ToolCall>, DomainError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToolCall::parse_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch() {
        let calls = parse_batch("# setup\nmkdirs out/classes\n\n  echo compiled  \n").unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name(), "mkdirs");
        assert_eq!(calls[0].arguments(), ["out/classes"]);
        assert_eq!(calls[1].to_string(), "echo compiled");
    }

    #[test]
    fn test_empty_batch() {
        assert!(parse_batch("# nothing\n\n").unwrap().is_empty());
    }
}
