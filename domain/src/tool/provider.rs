//! Tool provider abstraction
//!
//! A [`ToolProvider`] is the runnable behind a [`Tool`](super::entities::Tool).
//! The runner hands it two fresh output buffers and the call's arguments and
//! gets an exit code back; everything written to the buffers ends up in the
//! [`ExecutionRecord`](super::value_objects::ExecutionRecord).
//!
//! ```text
//!  ToolRunner ──prepare()──▶ ToolProvider ──run(out, err, args)──▶ exit code
//!                              │
//!            ┌─────────────────┼──────────────────┬───────────────────┐
//!            ▼                 ▼                  ▼                   ▼
//!      ┌──────────┐     ┌────────────┐     ┌────────────┐     ┌──────────────┐
//!      │ Builtin  │     │  Process   │     │  Bundle    │     │ LazyInstall  │
//!      │(in-proc) │     │ (PATH/dir) │     │ (isolated) │     │ (fetch once) │
//!      └──────────┘     └────────────┘     └────────────┘     └──────────────┘
//! ```
//!
//! Providers are synchronous; the runner invokes them on a blocking worker
//! thread so that concurrent calls never stall the async executor.

use std::fmt;
use std::io::Write;

use crate::core::error::DomainError;

/// Something that can be invoked with arguments and produces an exit code
pub trait ToolProvider: Send + Sync {
    /// Run with the given arguments, writing to `out` and `err`
    ///
    /// Exit code 0 means success; any other value is a failure that the
    /// runner records rather than raises.
    fn run(&self, out: &mut dyn Write, err: &mut dyn Write, args: &[String]) -> i32;

    /// Make the provider ready to run
    ///
    /// Lazy providers fetch their backing artifact here, surfacing
    /// install problems as [`DomainError::FetchFailed`].
    fn prepare(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Adapter turning a closure into a [`ToolProvider`]
pub struct FnProvider<F> {
    f: F,
}

impl<F> ToolProvider for FnProvider<F>
where
    F: Fn(&mut dyn Write, &mut dyn Write, &[String]) -> i32 + Send + Sync,
{
    fn run(&self, out: &mut dyn Write, err: &mut dyn Write, args: &[String]) -> i32 {
        (self.f)(out, err, args)
    }
}

impl<F> fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnProvider")
    }
}

/// Wrap a closure with the run signature into a provider
///
/// ```ignore
/// let ok = from_fn(|out, _err, _args| {
///     let _ = writeln!(out, "ok");
///     0
/// });
/// ```
pub fn from_fn<F>(f: F) -> FnProvider<F>
where
    F: Fn(&mut dyn Write, &mut dyn Write, &[String]) -> i32 + Send + Sync,
{
    FnProvider { f }
}
