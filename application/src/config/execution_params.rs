//! Execution parameters: build-wide switches for the runner, executor and resolver
//!
//! | Field | Used by | Default |
//! |-------|---------|---------|
//! | `parallel` | Tool Runner, Plan Executor | `true` |
//! | `failure_policy` | Plan Executor | `Continue` |
//! | `levels` | Plan Executor | none active |
//! | `max_resolve_iterations` | Dependency Resolver | 64 |

use serde::{Deserialize, Serialize};

use anvil_domain::LevelSet;

/// What a sequential group does after one of its leaves failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Keep running the remaining siblings
    #[default]
    Continue,
    /// Skip the remaining siblings and report the failure
    FailFast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Process-wide switch; a batch or plan runs in parallel only if this
    /// and its own flag are both set.
    pub parallel: bool,
    pub failure_policy: FailurePolicy,
    pub levels: LevelSet,
    /// Upper bound on resolver iterations.
    pub max_resolve_iterations: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            parallel: true,
            failure_policy: FailurePolicy::Continue,
            levels: LevelSet::new(),
            max_resolve_iterations: 64,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_levels(mut self, levels: LevelSet) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_max_resolve_iterations(mut self, max: usize) -> Self {
        self.max_resolve_iterations = max;
        self
    }
}
