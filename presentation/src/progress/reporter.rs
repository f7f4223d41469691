//! Progress reporting for plan execution

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anvil_application::PlanListener;
use anvil_domain::ExecutionResult;
use colored::Colorize;

/// Prints one line per finished or skipped task
///
/// Lines from parallel branches interleave in completion order.
pub struct ConsoleListener<W: Write + Send = io::Stderr> {
    out: Mutex<W>,
}

impl ConsoleListener {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> ConsoleListener<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn line(&self, text: String) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{}", text);
    }
}

impl<W: Write + Send> PlanListener for ConsoleListener<W> {
    fn ended(&self, title: &str, result: &ExecutionResult) {
        let elapsed = format!("({:.2?})", result.duration).dimmed();
        if result.is_successful() {
            self.line(format!("{} {} {}", "v".green(), title, elapsed));
        } else {
            let reason = result
                .cause
                .clone()
                .unwrap_or_else(|| format!("exit code {}", result.exit_code));
            self.line(format!("{} {} {} {}", "x".red(), title, elapsed, reason.red()));
        }
    }

    fn plan_ended(&self, title: &str, duration: Duration) {
        self.line(format!("{} {} {}", "=".cyan(), title.bold(), format!("({:.2?})", duration).dimmed()));
    }

    fn disabled(&self, title: &str) {
        self.line(format!("{} {} {}", "-".dimmed(), title.dimmed(), "(disabled)".dimmed()));
    }
}
