//! Tool domain value objects: execution records and the run history
//!
//! Every tool invocation produces one [`ExecutionRecord`], appended to the
//! build's [`ExecutionHistory`]. A non-zero exit code is *recorded*, not raised;
//! callers who need success use [`ExecutionRecord::require_successful`].

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;
use crate::core::string::truncate;

/// Immutable outcome of a single tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Name the tool was called by
    pub name: String,
    pub arguments: Vec<String>,
    /// Label of the thread that ran the provider
    pub thread: String,
    pub duration: Duration,
    pub exit_code: i32,
    /// Captured standard output
    pub output: String,
    /// Captured error output
    pub error: String,
}

impl ExecutionRecord {
    pub fn is_successful(&self) -> bool {
        self.exit_code == 0
    }

    /// Fail with [`DomainError::ToolExecutionFailed`] unless exit code is 0
    pub fn require_successful(&self) -> Result<&Self, DomainError> {
        if self.is_successful() {
            Ok(self)
        } else {
            Err(DomainError::ToolExecutionFailed {
                name: self.name.clone(),
                exit_code: self.exit_code,
            })
        }
    }

    /// `name arg1 arg2 ...`
    pub fn command_line(&self) -> String {
        if self.arguments.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.arguments.join(" "))
        }
    }

    /// First line of the output (or error output), shortened for tables
    pub fn brief(&self, max_len: usize) -> String {
        let text = if self.output.trim().is_empty() {
            &self.error
        } else {
            &self.output
        };
        truncate(text.lines().next().unwrap_or("").trim(), max_len)
    }
}

/// Append-only, thread-safe log of the records of one build invocation
#[derive(Debug, Default)]
pub struct ExecutionHistory {
    records: Mutex<Vec<ExecutionRecord>>,
}

impl ExecutionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: ExecutionRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Point-in-time copy of every record appended so far
    pub fn snapshot(&self) -> Vec<ExecutionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(name: &str, exit_code: i32) -> ExecutionRecord {
        ExecutionRecord {
            name: name.to_string(),
            arguments: vec!["--flag".to_string()],
            thread: "main".to_string(),
            duration: Duration::from_millis(5),
            exit_code,
            output: "first line\nsecond".to_string(),
            error: String::new(),
        }
    }

    #[test]
    fn test_require_successful() {
        assert!(record("ok", 0).require_successful().is_ok());
        let error = record("echo-fail", 1).require_successful().unwrap_err();
        assert_eq!(
            error,
            DomainError::ToolExecutionFailed {
                name: "echo-fail".to_string(),
                exit_code: 1
            }
        );
    }

    #[test]
    fn test_command_line_and_brief() {
        let r = record("javac", 0);
        assert_eq!(r.command_line(), "javac --flag");
        assert_eq!(r.brief(80), "first line");

        let mut quiet = record("jar", 2);
        quiet.output.clear();
        quiet.error = "boom".to_string();
        assert_eq!(quiet.brief(80), "boom");
    }

    #[test]
    fn test_history_is_shared_across_threads() {
        let history = Arc::new(ExecutionHistory::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let history = Arc::clone(&history);
                std::thread::spawn(move || history.append(record(&format!("t{}", i), 0)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 8);
        history.append(record("late", 0));
        assert_eq!(snapshot.len(), 8);
        assert_eq!(history.len(), 9);
    }
}
