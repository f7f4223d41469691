//! Build summary

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entities::ExecutionResult;
use crate::core::error::DomainError;
use crate::core::string::current_thread_label;
use crate::tool::value_objects::ExecutionRecord;

impl ExecutionRecord {
    /// Record for a leaf task, named by its title
    pub fn from_result(title: impl Into<String>, result: &ExecutionResult) -> Self {
        Self {
            name: title.into(),
            arguments: Vec::new(),
            thread: current_thread_label(),
            duration: result.duration,
            exit_code: result.exit_code,
            output: result.output.clone(),
            error: result.error.clone(),
        }
    }
}

/// Aggregated outcome of one plan run
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    /// Executed leaves, in completion order
    pub records: Vec<ExecutionRecord>,
    /// Titles of nodes that were not run
    pub skipped: Vec<String>,
    /// Every tool invocation made during the build
    pub tool_history: Vec<ExecutionRecord>,
}

impl Summary {
    pub fn new(title: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            started_at,
            duration: Duration::ZERO,
            records: Vec::new(),
            skipped: Vec::new(),
            tool_history: Vec::new(),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExecutionRecord> {
        self.records.iter().filter(|r| !r.is_successful())
    }

    pub fn is_successful(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Fail naming the first failed leaf, if any
    pub fn require_successful(&self) -> Result<(), DomainError> {
        match self.failures().next() {
            Some(record) => record.require_successful().map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn exit_codes(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.exit_code).collect()
    }
}
