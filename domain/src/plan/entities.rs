//! Plan tree entities
//!
//! A plan is a tagged tree: [`Node::Leaf`] wraps a runnable [`Task`],
//! [`Node::Group`] nests another [`Plan`]. Executors dispatch on the variant.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::level::EnablementLevel;
use crate::tool::value_objects::ExecutionRecord;

/// What a leaf task produced
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub duration: Duration,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub error: String,
    /// Error that prevented the task from completing normally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ExecutionResult {
    pub fn ok(duration: Duration) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    /// A task that raised instead of returning an exit code
    pub fn failed(cause: impl fmt::Display, duration: Duration) -> Self {
        let cause = cause.to_string();
        Self {
            exit_code: 1,
            duration,
            output: String::new(),
            error: cause.clone(),
            cause: Some(cause),
        }
    }

    pub fn from_record(record: &ExecutionRecord) -> Self {
        Self {
            exit_code: record.exit_code,
            duration: record.duration,
            output: record.output.clone(),
            error: record.error.clone(),
            cause: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn is_successful(&self) -> bool {
        self.exit_code == 0 && self.cause.is_none()
    }
}

/// A unit of work in a plan
#[async_trait]
pub trait Task: Send + Sync {
    fn title(&self) -> String;

    async fn execute(&self) -> ExecutionResult;
}

/// A task plus the level that enables it
#[derive(Clone)]
pub struct LeafTask {
    pub level: EnablementLevel,
    pub task: Arc<dyn Task>,
}

impl LeafTask {
    pub fn new(task: impl Task + 'static) -> Self {
        Self {
            level: EnablementLevel::Always,
            task: Arc::new(task),
        }
    }

    pub fn with_level(mut self, level: EnablementLevel) -> Self {
        self.level = level;
        self
    }

    pub fn title(&self) -> String {
        self.task.title()
    }
}

impl fmt::Debug for LeafTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafTask")
            .field("title", &self.task.title())
            .field("level", &self.level)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Leaf(LeafTask),
    Group(Plan),
}

impl Node {
    pub fn title(&self) -> String {
        match self {
            Node::Leaf(leaf) => leaf.title(),
            Node::Group(plan) => plan.title.clone(),
        }
    }

    pub fn level(&self) -> &EnablementLevel {
        match self {
            Node::Leaf(leaf) => &leaf.level,
            Node::Group(plan) => &plan.level,
        }
    }
}

impl From<LeafTask> for Node {
    fn from(leaf: LeafTask) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<Plan> for Node {
    fn from(plan: Plan) -> Self {
        Node::Group(plan)
    }
}

/// A named group of child nodes, run in sequence or in parallel
#[derive(Debug, Clone)]
pub struct Plan {
    pub title: String,
    pub level: EnablementLevel,
    pub parallel: bool,
    pub children: Vec<Node>,
}

impl Plan {
    pub fn sequence(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            level: EnablementLevel::Always,
            parallel: false,
            children: Vec::new(),
        }
    }

    pub fn parallel(title: impl Into<String>) -> Self {
        Self {
            parallel: true,
            ..Self::sequence(title)
        }
    }

    pub fn with_level(mut self, level: EnablementLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Shorthand for an always-enabled leaf
    pub fn with_task(self, task: impl Task + 'static) -> Self {
        self.with_child(LeafTask::new(task))
    }

    /// Every level used anywhere in this tree, depth first
    pub fn levels(&self) -> Vec<&EnablementLevel> {
        let mut levels = vec![&self.level];
        for child in &self.children {
            match child {
                Node::Leaf(leaf) => levels.push(&leaf.level),
                Node::Group(plan) => levels.extend(plan.levels()),
            }
        }
        levels
    }

    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::Leaf(_) => 1,
                Node::Group(plan) => plan.leaf_count(),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl Task for Named {
        fn title(&self) -> String {
            self.0.to_string()
        }

        async fn execute(&self) -> ExecutionResult {
            ExecutionResult::ok(Duration::ZERO)
        }
    }

    #[test]
    fn test_result_success() {
        assert!(ExecutionResult::ok(Duration::ZERO).is_successful());
        let failed = ExecutionResult::failed("boom", Duration::from_millis(1));
        assert!(!failed.is_successful());
        assert_eq!(failed.exit_code, 1);
        assert_eq!(failed.cause.as_deref(), Some("boom"));
    }

    #[test]
    fn test_plan_levels_and_leaf_count() {
        let plan = Plan::sequence("build")
            .with_task(Named("compile"))
            .with_child(
                Plan::parallel("checks")
                    .with_level(EnablementLevel::named("verbose"))
                    .with_task(Named("lint"))
                    .with_child(LeafTask::new(Named("docs")).with_level(EnablementLevel::Never)),
            );

        assert_eq!(plan.leaf_count(), 3);
        let levels: Vec<String> = plan.levels().iter().map(|l| l.to_string()).collect();
        assert_eq!(levels, ["always", "always", "verbose", "always", "never"]);
        assert_eq!(plan.children[1].title(), "checks");
        assert!(matches!(plan.children[1], Node::Group(ref p) if p.parallel));
    }

    #[tokio::test]
    async fn test_task_executes() {
        let leaf = LeafTask::new(Named("compile"));
        assert_eq!(leaf.title(), "compile");
        assert!(leaf.task.execute().await.is_successful());
    }
}
