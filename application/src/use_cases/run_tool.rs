//! Run Tool use case.
//!
//! Resolves a [`ToolCall`] through the configured finder chain, invokes the
//! provider with fresh output buffers and records the outcome in the build's
//! [`ExecutionHistory`].
//!
//! ```text
//! ToolCall ─▶ finder.find(name) ─▶ spawn_blocking { prepare, run(out, err, args) } ─▶ ExecutionRecord
//!                  │ None                                                                 │
//!                  ▼                                                                      ▼
//!            ToolNotFound                                                   history.append(record)
//! ```
//!
//! Providers are synchronous, so every invocation runs on tokio's blocking
//! pool. A batch is either run one call after another, in list order, or all
//! at once and joined; either way the records come back in input order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anvil_domain::core::string::current_thread_label;
use anvil_domain::{
    DomainError, ExecutionHistory, ExecutionRecord, PositionalTweak, Tool, ToolCall, ToolFinder,
    apply_positional_tweaks,
};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Use case for invoking tools by name.
pub struct ToolRunner {
    finder: Arc<dyn ToolFinder>,
    history: Arc<ExecutionHistory>,
    parallel_allowed: bool,
}

impl ToolRunner {
    pub fn new(finder: Arc<dyn ToolFinder>, history: Arc<ExecutionHistory>) -> Self {
        Self {
            finder,
            history,
            parallel_allowed: true,
        }
    }

    /// Process-wide switch; `false` forces every batch to run sequentially
    pub fn with_parallel(mut self, allowed: bool) -> Self {
        self.parallel_allowed = allowed;
        self
    }

    pub fn finder(&self) -> &Arc<dyn ToolFinder> {
        &self.finder
    }

    pub fn history(&self) -> &Arc<ExecutionHistory> {
        &self.history
    }

    /// Run a single call.
    ///
    /// A non-zero exit code is recorded, not raised. Errors are reserved for
    /// unknown tools and for providers that fail to prepare.
    pub async fn run(&self, call: &ToolCall) -> Result<ExecutionRecord, DomainError> {
        let tool = self
            .finder
            .find(call.name())
            .ok_or_else(|| DomainError::ToolNotFound(call.name().to_string()))?;

        info!("| {}", call);

        let name = call.name().to_string();
        let arguments = call.arguments().to_vec();
        let started = Instant::now();
        let record = match tokio::task::spawn_blocking({
            let name = name.clone();
            let arguments = arguments.clone();
            move || invoke(&tool, name, arguments)
        })
        .await
        {
            Ok(record) => record?,
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool invocation aborted");
                aborted(name, arguments, started.elapsed(), e.to_string())
            }
        };

        debug!(
            tool = %record.name,
            exit_code = record.exit_code,
            duration_ms = record.duration.as_millis() as u64,
            "Tool finished"
        );
        self.history.append(record.clone());
        Ok(record)
    }

    /// Run a batch of calls.
    ///
    /// Calls run concurrently only when both `parallel` and the process-wide
    /// switch are set. Every call of a parallel batch is joined before the
    /// first error (if any) is returned.
    pub async fn run_all(
        &self,
        calls: &[ToolCall],
        parallel: bool,
    ) -> Result<Vec<ExecutionRecord>, DomainError> {
        if parallel && self.parallel_allowed {
            debug!(calls = calls.len(), "Running tool calls in parallel");
            join_all(calls.iter().map(|call| self.run(call)))
                .await
                .into_iter()
                .collect()
        } else {
            let mut records = Vec::with_capacity(calls.len());
            for call in calls {
                records.push(self.run(call).await?);
            }
            Ok(records)
        }
    }

    /// Run a batch after applying each tweak to the call at its index
    pub async fn run_all_with_tweaks(
        &self,
        calls: Vec<ToolCall>,
        tweaks: &[PositionalTweak],
        parallel: bool,
    ) -> Result<Vec<ExecutionRecord>, DomainError> {
        let calls = apply_positional_tweaks(calls, tweaks);
        self.run_all(&calls, parallel).await
    }
}

fn invoke(tool: &Tool, name: String, arguments: Vec<String>) -> Result<ExecutionRecord, DomainError> {
    let provider = tool.provider();
    provider.prepare()?;

    let mut out = Vec::new();
    let mut err = Vec::new();
    let start = Instant::now();
    let exit_code = provider.run(&mut out, &mut err, &arguments);
    let duration = start.elapsed();

    Ok(ExecutionRecord {
        name,
        arguments,
        thread: current_thread_label(),
        duration,
        exit_code,
        output: String::from_utf8_lossy(&out).into_owned(),
        error: String::from_utf8_lossy(&err).into_owned(),
    })
}

fn aborted(name: String, arguments: Vec<String>, duration: Duration, error: String) -> ExecutionRecord {
    ExecutionRecord {
        name,
        arguments,
        thread: current_thread_label(),
        duration,
        exit_code: -1,
        output: String::new(),
        error,
    }
}
