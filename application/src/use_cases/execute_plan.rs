//! Execute Plan use case.
//!
//! Walks a [`Plan`] tree, running each admitted leaf and reporting to a
//! [`PlanListener`]. Every node goes `Pending → Skipped` or
//! `Pending → Running → Done`.
//!
//! # Parallelism
//!
//! A group runs its children concurrently only if its own `parallel` flag
//! and the process-wide switch are both set. Concurrent children are spawned
//! onto the tokio worker pool and all joined before the group ends.
//!
//! # Failures
//!
//! | Policy | Sequential group after a failed child | Parallel group |
//! |--------|----------------------------------------|----------------|
//! | `Continue` | runs the remaining children | runs all |
//! | `FailFast` | reports the rest as disabled | runs all |

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use anvil_domain::{
    DomainError, ExecutionRecord, ExecutionResult, LeafTask, LevelSet, Node, Plan, Summary,
};
use chrono::Utc;
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tracing::{debug, warn};

use crate::config::{ExecutionParams, FailurePolicy};
use crate::ports::listener::{CompositeListener, LoggingListener, PlanListener};

/// Use case for running build plans.
#[derive(Clone)]
pub struct PlanExecutor {
    levels: Arc<LevelSet>,
    parallel_allowed: bool,
    failure_policy: FailurePolicy,
    listener: Arc<dyn PlanListener>,
}

impl PlanExecutor {
    pub fn new(levels: LevelSet) -> Self {
        Self {
            levels: Arc::new(levels),
            parallel_allowed: true,
            failure_policy: FailurePolicy::Continue,
            listener: Arc::new(LoggingListener),
        }
    }

    pub fn from_params(params: &ExecutionParams) -> Self {
        Self::new(params.levels.clone())
            .with_parallel(params.parallel)
            .with_failure_policy(params.failure_policy)
    }

    pub fn with_parallel(mut self, allowed: bool) -> Self {
        self.parallel_allowed = allowed;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Replace the progress listener (defaults to [`LoggingListener`])
    pub fn with_listener(mut self, listener: Arc<dyn PlanListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Check every level in the tree against the known set
    pub fn validate(&self, plan: &Plan) -> Result<(), DomainError> {
        for level in plan.levels() {
            self.levels.validate(level)?;
        }
        Ok(())
    }

    /// Run the plan and collect a [`Summary`] of the executed leaves.
    ///
    /// Fails only when validation fails; leaf failures are part of the summary.
    pub async fn run(&self, plan: &Plan) -> Result<Summary, DomainError> {
        self.validate(plan)?;

        let started_at = Utc::now();
        let start = Instant::now();
        let recorder = Arc::new(SummaryRecorder::default());
        let recording: Arc<dyn PlanListener> = recorder.clone();
        let listener: Arc<dyn PlanListener> = Arc::new(CompositeListener::new(vec![
            recording,
            Arc::clone(&self.listener),
        ]));

        let success = self.execute_node(Node::Group(plan.clone()), listener).await;
        debug!(plan = %plan.title, success, "Plan finished");

        let mut summary = Summary::new(&plan.title, started_at);
        summary.duration = start.elapsed();
        let (records, skipped) = recorder.take();
        summary.records = records;
        summary.skipped = skipped;
        Ok(summary)
    }

    /// Execute one node; resolves to `true` if every executed leaf succeeded
    fn execute_node(&self, node: Node, listener: Arc<dyn PlanListener>) -> BoxFuture<'static, bool> {
        let executor = self.clone();
        async move {
            if !executor.levels.admits(node.level()) {
                listener.disabled(&node.title());
                return true;
            }
            match node {
                Node::Leaf(leaf) => executor.execute_leaf(leaf, listener.as_ref()).await,
                Node::Group(plan) => executor.execute_group(plan, listener).await,
            }
        }
        .boxed()
    }

    async fn execute_leaf(&self, leaf: LeafTask, listener: &dyn PlanListener) -> bool {
        let title = leaf.title();
        listener.began(&title);

        let start = Instant::now();
        let task = Arc::clone(&leaf.task);
        let result = match tokio::spawn(async move { task.execute().await }).await {
            Ok(result) => result,
            Err(e) => {
                warn!(task = %title, error = %e, "Task aborted");
                ExecutionResult::failed(format!("Task aborted: {}", e), start.elapsed())
            }
        };

        listener.ended(&title, &result);
        result.is_successful()
    }

    async fn execute_group(&self, plan: Plan, listener: Arc<dyn PlanListener>) -> bool {
        listener.began(&plan.title);
        let start = Instant::now();

        let success = if plan.parallel && self.parallel_allowed {
            let handles = plan
                .children
                .into_iter()
                .map(|child| tokio::spawn(self.execute_node(child, Arc::clone(&listener))));
            join_all(handles)
                .await
                .into_iter()
                .fold(true, |all, joined| joined.unwrap_or(false) && all)
        } else {
            let mut success = true;
            let mut children = plan.children.into_iter();
            while let Some(child) = children.next() {
                if self.execute_node(child, Arc::clone(&listener)).await {
                    continue;
                }
                success = false;
                if self.failure_policy == FailurePolicy::FailFast {
                    for rest in children.by_ref() {
                        listener.disabled(&rest.title());
                    }
                    break;
                }
            }
            success
        };

        listener.plan_ended(&plan.title, start.elapsed());
        success
    }
}

/// Listener that turns finished leaves into summary records
#[derive(Default)]
struct SummaryRecorder {
    records: Mutex<Vec<ExecutionRecord>>,
    skipped: Mutex<Vec<String>>,
}

impl SummaryRecorder {
    fn take(&self) -> (Vec<ExecutionRecord>, Vec<String>) {
        let records = std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner));
        let skipped = std::mem::take(&mut *self.skipped.lock().unwrap_or_else(PoisonError::into_inner));
        (records, skipped)
    }
}

impl PlanListener for SummaryRecorder {
    fn ended(&self, title: &str, result: &ExecutionResult) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ExecutionRecord::from_result(title, result));
    }

    fn disabled(&self, title: &str) {
        self.skipped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(title.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_domain::{EnablementLevel, Task};
    use async_trait::async_trait;
    use std::time::Duration;

    struct Step {
        title: &'static str,
        exit_code: i32,
        delay: Duration,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Task for Step {
        fn title(&self) -> String {
            self.title.to_string()
        }

        async fn execute(&self) -> ExecutionResult {
            self.log.lock().unwrap().push(format!("start {}", self.title));
            tokio::time::sleep(self.delay).await;
            self.log.lock().unwrap().push(format!("end {}", self.title));
            ExecutionResult {
                exit_code: self.exit_code,
                duration: self.delay,
                ..Default::default()
            }
        }
    }

    fn step(log: &Arc<Mutex<Vec<String>>>, title: &'static str, exit_code: i32, delay_ms: u64) -> Step {
        Step {
            title,
            exit_code,
            delay: Duration::from_millis(delay_ms),
            log: Arc::clone(log),
        }
    }

    fn titles(summary: &Summary) -> Vec<&str> {
        summary.records.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_sequential_plan_runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = Plan::sequence("build")
            .with_task(step(&log, "a", 0, 20))
            .with_task(step(&log, "b", 0, 0));

        let summary = PlanExecutor::new(LevelSet::new()).run(&plan).await.unwrap();
        assert_eq!(titles(&summary), ["a", "b"]);
        assert_eq!(*log.lock().unwrap(), ["start a", "end a", "start b", "end b"]);
        assert!(summary.is_successful());
        assert_eq!(summary.title, "build");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_plan_records_completion_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = Plan::parallel("checks")
            .with_task(step(&log, "slow", 0, 150))
            .with_task(step(&log, "fast", 0, 0));

        let summary = PlanExecutor::new(LevelSet::new()).run(&plan).await.unwrap();
        assert_eq!(titles(&summary), ["fast", "slow"]);
    }

    #[tokio::test]
    async fn test_parallel_switch_off_runs_sequentially() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = Plan::parallel("checks")
            .with_task(step(&log, "slow", 0, 50))
            .with_task(step(&log, "fast", 0, 0));

        let summary = PlanExecutor::new(LevelSet::new())
            .with_parallel(false)
            .run(&plan)
            .await
            .unwrap();
        assert_eq!(titles(&summary), ["slow", "fast"]);
    }

    #[tokio::test]
    async fn test_level_filtering() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = Plan::sequence("build")
            .with_child(LeafTask::new(step(&log, "never", 0, 0)).with_level(EnablementLevel::Never))
            .with_child(LeafTask::new(step(&log, "always", 0, 0)))
            .with_child(
                LeafTask::new(step(&log, "verbose", 0, 0))
                    .with_level(EnablementLevel::named("verbose")),
            )
            .with_child(
                Plan::sequence("docs")
                    .with_level(EnablementLevel::named("docs"))
                    .with_task(step(&log, "javadoc", 0, 0)),
            );

        let levels = LevelSet::new().with_known("docs").activate("verbose");
        let summary = PlanExecutor::new(levels).run(&plan).await.unwrap();
        assert_eq!(titles(&summary), ["always", "verbose"]);
        assert_eq!(summary.skipped, ["never", "docs"]);

        let quiet = LevelSet::new().with_known("docs").with_known("verbose");
        let summary = PlanExecutor::new(quiet).run(&plan).await.unwrap();
        assert_eq!(titles(&summary), ["always"]);
    }

    #[tokio::test]
    async fn test_unknown_level_fails_before_running() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = Plan::sequence("build")
            .with_task(step(&log, "a", 0, 0))
            .with_child(
                LeafTask::new(step(&log, "b", 0, 0)).with_level(EnablementLevel::named("mystery")),
            );

        let error = PlanExecutor::new(LevelSet::new()).run(&plan).await.unwrap_err();
        assert_eq!(error, DomainError::UnsupportedEnablementLevel("mystery".to_string()));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_continue_policy_runs_remaining_children() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = Plan::sequence("build")
            .with_task(step(&log, "fail", 2, 0))
            .with_task(step(&log, "after", 0, 0));

        let summary = PlanExecutor::new(LevelSet::new()).run(&plan).await.unwrap();
        assert_eq!(summary.exit_codes(), [2, 0]);
        assert!(summary.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_fail_fast_skips_remaining_siblings() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = Plan::sequence("build")
            .with_task(step(&log, "fail", 1, 0))
            .with_task(step(&log, "after", 0, 0))
            .with_child(Plan::sequence("nested").with_task(step(&log, "deep", 0, 0)));

        let summary = PlanExecutor::new(LevelSet::new())
            .with_failure_policy(FailurePolicy::FailFast)
            .run(&plan)
            .await
            .unwrap();
        assert_eq!(titles(&summary), ["fail"]);
        assert_eq!(summary.skipped, ["after", "nested"]);
    }

    #[derive(Default)]
    struct Events(Mutex<Vec<String>>);

    impl PlanListener for Events {
        fn began(&self, title: &str) {
            self.0.lock().unwrap().push(format!("began {}", title));
        }

        fn ended(&self, title: &str, _result: &ExecutionResult) {
            self.0.lock().unwrap().push(format!("ended {}", title));
        }

        fn plan_ended(&self, title: &str, _duration: Duration) {
            self.0.lock().unwrap().push(format!("plan_ended {}", title));
        }
    }

    #[tokio::test]
    async fn test_listener_sees_plans_and_leaves() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let events = Arc::new(Events::default());
        let plan = Plan::sequence("build").with_task(step(&log, "a", 0, 0));

        PlanExecutor::new(LevelSet::new())
            .with_listener(events.clone())
            .run(&plan)
            .await
            .unwrap();
        assert_eq!(
            *events.0.lock().unwrap(),
            ["began build", "began a", "ended a", "plan_ended build"]
        );
    }
}
