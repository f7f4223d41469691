//! Plan listener port
//!
//! Defines the callbacks the plan executor fires while walking a plan.
//!
//! ```text
//! Plan "build"   began ─────────────────────────────────────────── plan_ended
//!   Leaf "a"          began ── ended
//!   Leaf "b"                       began ── ended
//!   Leaf "docs"                                   disabled
//! ```
//!
//! Listeners are shared between parallel branches, so every callback takes
//! `&self` and implementations synchronize internally.

use std::sync::Arc;
use std::time::Duration;

use anvil_domain::ExecutionResult;
use tracing::{debug, info, warn};

pub trait PlanListener: Send + Sync {
    /// A leaf or a plan is about to run
    fn began(&self, _title: &str) {}

    /// A leaf finished
    fn ended(&self, _title: &str, _result: &ExecutionResult) {}

    /// A plan finished all of its children
    fn plan_ended(&self, _title: &str, _duration: Duration) {}

    /// A node was skipped because its level is not admitted
    fn disabled(&self, _title: &str) {}
}

/// No-op listener
pub struct NoListener;

impl PlanListener for NoListener {}

/// Reports plan progress through `tracing`
pub struct LoggingListener;

impl PlanListener for LoggingListener {
    fn began(&self, title: &str) {
        debug!(task = %title, "Task began");
    }

    fn ended(&self, title: &str, result: &ExecutionResult) {
        if result.is_successful() {
            info!(task = %title, duration_ms = result.duration.as_millis() as u64, "Task done");
        } else {
            warn!(
                task = %title,
                exit_code = result.exit_code,
                cause = result.cause.as_deref().unwrap_or(""),
                "Task failed"
            );
        }
    }

    fn plan_ended(&self, title: &str, duration: Duration) {
        info!(plan = %title, duration_ms = duration.as_millis() as u64, "Plan done");
    }

    fn disabled(&self, title: &str) {
        debug!(task = %title, "Task disabled");
    }
}

/// Fans every callback out to several listeners, in order
#[derive(Clone, Default)]
pub struct CompositeListener {
    delegates: Vec<Arc<dyn PlanListener>>,
}

impl CompositeListener {
    pub fn new(delegates: Vec<Arc<dyn PlanListener>>) -> Self {
        Self { delegates }
    }

    pub fn with(mut self, listener: Arc<dyn PlanListener>) -> Self {
        self.delegates.push(listener);
        self
    }
}

macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl PlanListener for CompositeListener {
    fn began(&self, title: &str) {
        delegate!(self, began, title);
    }

    fn ended(&self, title: &str, result: &ExecutionResult) {
        delegate!(self, ended, title, result);
    }

    fn plan_ended(&self, title: &str, duration: Duration) {
        delegate!(self, plan_ended, title, duration);
    }

    fn disabled(&self, title: &str) {
        delegate!(self, disabled, title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<String>>,
    }

    impl PlanListener for Recording {
        fn began(&self, title: &str) {
            self.events.lock().unwrap().push(format!("began {}", title));
        }

        fn disabled(&self, title: &str) {
            self.events.lock().unwrap().push(format!("disabled {}", title));
        }
    }

    #[test]
    fn test_composite_delegates_to_all() {
        let first = Arc::new(Recording::default());
        let second = Arc::new(Recording::default());
        let composite = CompositeListener::default()
            .with(first.clone())
            .with(second.clone())
            .with(Arc::new(NoListener));

        composite.began("a");
        composite.ended("a", &ExecutionResult::ok(Duration::ZERO));
        composite.disabled("b");

        for recording in [&first, &second] {
            assert_eq!(*recording.events.lock().unwrap(), ["began a", "disabled b"]);
        }
    }
}
