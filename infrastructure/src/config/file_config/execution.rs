//! Execution configuration from TOML (`[execution]` section)

use anvil_application::{ExecutionParams, FailurePolicy};
use anvil_domain::LevelSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Allow parallel batches and plan groups
    pub parallel: bool,
    /// Stop a sequence at its first failed leaf
    pub fail_fast: bool,
    /// Named enablement levels the build knows about
    pub levels: Vec<String>,
    /// Levels switched on (implicitly known)
    pub active: Vec<String>,
    pub max_resolve_iterations: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            parallel: params.parallel,
            fail_fast: params.failure_policy == FailurePolicy::FailFast,
            levels: Vec::new(),
            active: Vec::new(),
            max_resolve_iterations: params.max_resolve_iterations,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_params(&self) -> ExecutionParams {
        let levels = self
            .levels
            .iter()
            .fold(LevelSet::new(), |set, name| set.with_known(name));
        let levels = self.active.iter().fold(levels, |set, name| set.activate(name));
        let policy = if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        };

        ExecutionParams::default()
            .with_parallel(self.parallel)
            .with_failure_policy(policy)
            .with_levels(levels)
            .with_max_resolve_iterations(self.max_resolve_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_domain::EnablementLevel;

    #[test]
    fn test_to_params() {
        let toml_str = r#"
parallel = false
fail_fast = true
levels = ["nightly"]
active = ["verbose"]
"#;
        let config: FileExecutionConfig = toml::from_str(toml_str).unwrap();
        let params = config.to_params();

        assert!(!params.parallel);
        assert_eq!(params.failure_policy, FailurePolicy::FailFast);
        assert!(params.levels.validate(&EnablementLevel::named("nightly")).is_ok());
        assert!(!params.levels.admits(&EnablementLevel::named("nightly")));
        assert!(params.levels.admits(&EnablementLevel::named("verbose")));
        assert_eq!(params.max_resolve_iterations, 64);
    }
}
