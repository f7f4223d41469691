//! Build Session use case.
//!
//! Scopes one build invocation. The session owns the execution history for
//! the build, the runner that appends to it and the plan executor; running a
//! plan consumes the session and hands the history over to the [`Summary`].
//!
//! ```text
//! BuildSession::new(finder, params)
//!     ├── ExecutionHistory   (fresh, this build only)
//!     ├── ToolRunner         (finder + history)
//!     └── PlanExecutor       (levels, parallel switch, failure policy)
//!
//! session.run(plan) ──▶ Ok(Summary)  |  Err(BuildFailure { summary, error })
//! ```

use std::sync::Arc;

use anvil_domain::{DomainError, ExecutionHistory, Plan, Summary, ToolCall, ToolFinder};
use chrono::Utc;
use thiserror::Error;
use tracing::info;

use super::execute_plan::PlanExecutor;
use super::run_tool::ToolRunner;
use super::tasks::RunToolTask;
use crate::config::{ExecutionParams, FailurePolicy};
use crate::ports::listener::PlanListener;

/// A build that could not complete
///
/// Carries whatever was executed before the build halted.
#[derive(Debug, Error)]
#[error("Build `{}` failed: {error}", .summary.title)]
pub struct BuildFailure {
    pub summary: Box<Summary>,
    #[source]
    pub error: DomainError,
}

pub struct BuildSession {
    history: Arc<ExecutionHistory>,
    runner: Arc<ToolRunner>,
    executor: PlanExecutor,
}

impl BuildSession {
    pub fn new(finder: Arc<dyn ToolFinder>, params: &ExecutionParams) -> Self {
        let history = Arc::new(ExecutionHistory::new());
        let runner = Arc::new(
            ToolRunner::new(finder, Arc::clone(&history)).with_parallel(params.parallel),
        );
        Self {
            history,
            runner,
            executor: PlanExecutor::from_params(params),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn PlanListener>) -> Self {
        self.executor = self.executor.with_listener(listener);
        self
    }

    pub fn runner(&self) -> &Arc<ToolRunner> {
        &self.runner
    }

    pub fn history(&self) -> &Arc<ExecutionHistory> {
        &self.history
    }

    /// Leaf task that runs `call` with this session's runner
    pub fn tool_task(&self, call: ToolCall) -> RunToolTask {
        RunToolTask::new(call, Arc::clone(&self.runner))
    }

    /// Run the plan and close the session.
    ///
    /// Invalid plans fail before anything runs. With [`FailurePolicy::FailFast`]
    /// a failed leaf also fails the build; with `Continue` the summary is
    /// returned and the caller decides via [`Summary::require_successful`].
    pub async fn run(self, plan: &Plan) -> Result<Summary, BuildFailure> {
        info!(plan = %plan.title, leaves = plan.leaf_count(), "Build started");

        let mut summary = match self.executor.run(plan).await {
            Ok(summary) => summary,
            Err(error) => {
                let mut summary = Summary::new(&plan.title, Utc::now());
                summary.tool_history = self.history.snapshot();
                return Err(BuildFailure {
                    summary: Box::new(summary),
                    error,
                });
            }
        };
        summary.tool_history = self.history.snapshot();

        info!(
            plan = %plan.title,
            executed = summary.records.len(),
            skipped = summary.skipped.len(),
            duration_ms = summary.duration.as_millis() as u64,
            "Build finished"
        );

        if self.executor.failure_policy() == FailurePolicy::FailFast
            && let Err(error) = summary.require_successful()
        {
            return Err(BuildFailure {
                summary: Box::new(summary),
                error,
            });
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_domain::{EnablementLevel, LeafTask, Tool, ToolIdentifier, ToolTable, from_fn};
    use std::io::Write;

    fn finder() -> Arc<dyn ToolFinder> {
        Arc::new(
            ToolTable::new()
                .with(Tool::new(
                    ToolIdentifier::parse("echo-ok").unwrap(),
                    from_fn(|out, _, _| {
                        let _ = writeln!(out, "ok");
                        0
                    }),
                ))
                .with(Tool::new(
                    ToolIdentifier::parse("echo-fail").unwrap(),
                    from_fn(|_, err, _| {
                        let _ = writeln!(err, "failed");
                        1
                    }),
                )),
        )
    }

    fn plan(session: &BuildSession) -> Plan {
        Plan::sequence("build")
            .with_task(session.tool_task(ToolCall::new("echo-ok")))
            .with_task(session.tool_task(ToolCall::new("echo-fail")))
    }

    #[tokio::test]
    async fn test_end_to_end_echo_ok_and_echo_fail() {
        let session = BuildSession::new(finder(), &ExecutionParams::default());
        let plan = plan(&session);

        let summary = session.run(&plan).await.unwrap();
        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.exit_codes(), [0, 1]);
        assert_eq!(summary.tool_history.len(), 2);

        let error = summary.require_successful().unwrap_err();
        assert!(error.to_string().contains("echo-fail"));
        assert_eq!(
            error,
            DomainError::ToolExecutionFailed {
                name: "echo-fail".to_string(),
                exit_code: 1
            }
        );
    }

    #[tokio::test]
    async fn test_fail_fast_returns_partial_summary() {
        let params = ExecutionParams::default().with_failure_policy(FailurePolicy::FailFast);
        let session = BuildSession::new(finder(), &params);
        let plan = Plan::sequence("build")
            .with_task(session.tool_task(ToolCall::new("echo-fail")))
            .with_task(session.tool_task(ToolCall::new("echo-ok")));

        let failure = session.run(&plan).await.unwrap_err();
        assert_eq!(failure.summary.exit_codes(), [1]);
        assert_eq!(failure.summary.skipped, ["echo-ok"]);
        assert!(failure.to_string().contains("echo-fail"));
    }

    #[tokio::test]
    async fn test_invalid_level_fails_without_running() {
        let session = BuildSession::new(finder(), &ExecutionParams::default());
        let history = Arc::clone(session.history());
        let plan = Plan::sequence("build").with_child(
            LeafTask::new(session.tool_task(ToolCall::new("echo-ok")))
                .with_level(EnablementLevel::named("nightly")),
        );

        let failure = session.run(&plan).await.unwrap_err();
        assert_eq!(
            failure.error,
            DomainError::UnsupportedEnablementLevel("nightly".to_string())
        );
        assert!(failure.summary.records.is_empty());
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool_is_a_failed_leaf() {
        let session = BuildSession::new(finder(), &ExecutionParams::default());
        let plan = Plan::sequence("build").with_task(session.tool_task(ToolCall::new("missing")));

        let summary = session.run(&plan).await.unwrap();
        assert_eq!(summary.exit_codes(), [1]);
        assert!(summary.records[0].error.contains("Tool not found"));
        assert!(summary.tool_history.is_empty());
    }
}
