//! Leaf tasks for build plans
//!
//! | Task | Title | Does |
//! |------|-------|------|
//! | [`RunToolTask`] | the call's command line | runs one tool call |
//! | [`ResolveTask`] | `Resolve missing components` | runs the dependency resolver |
//! | [`CreateDirectoriesTask`] | `Create directories` | creates directories |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anvil_domain::{ExecutionResult, Task, ToolCall};
use async_trait::async_trait;

use super::resolve_components::DependencyResolver;
use super::run_tool::ToolRunner;

/// Runs a single tool call through the runner
pub struct RunToolTask {
    call: ToolCall,
    runner: Arc<ToolRunner>,
    title: Option<String>,
}

impl RunToolTask {
    pub fn new(call: ToolCall, runner: Arc<ToolRunner>) -> Self {
        Self {
            call,
            runner,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn call(&self) -> &ToolCall {
        &self.call
    }
}

#[async_trait]
impl Task for RunToolTask {
    fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.call.to_string())
    }

    async fn execute(&self) -> ExecutionResult {
        let start = Instant::now();
        match self.runner.run(&self.call).await {
            Ok(record) => ExecutionResult::from_record(&record),
            Err(e) => ExecutionResult::failed(e, start.elapsed()),
        }
    }
}

/// Fetches every missing external component
pub struct ResolveTask {
    resolver: Arc<DependencyResolver>,
}

impl ResolveTask {
    pub fn new(resolver: Arc<DependencyResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Task for ResolveTask {
    fn title(&self) -> String {
        "Resolve missing components".to_string()
    }

    async fn execute(&self) -> ExecutionResult {
        let start = Instant::now();
        match self.resolver.resolve_missing().await {
            Ok(report) => ExecutionResult::ok(start.elapsed()).with_output(format!(
                "Resolved {} component(s) in {} iteration(s)",
                report.resolved.len(),
                report.iterations
            )),
            Err(e) => ExecutionResult::failed(e, start.elapsed()),
        }
    }
}

/// Creates directories (and their parents) ahead of tools that write into them
pub struct CreateDirectoriesTask {
    paths: Vec<PathBuf>,
}

impl CreateDirectoriesTask {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Task for CreateDirectoriesTask {
    fn title(&self) -> String {
        "Create directories".to_string()
    }

    async fn execute(&self) -> ExecutionResult {
        let start = Instant::now();
        for path in &self.paths {
            if let Err(e) = tokio::fs::create_dir_all(path).await {
                return ExecutionResult::failed(
                    format!("Cannot create {}: {}", path.display(), e),
                    start.elapsed(),
                );
            }
        }
        ExecutionResult::ok(start.elapsed())
    }
}
