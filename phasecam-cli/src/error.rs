//! CLI error handling on top of the core error types.
//!
//! Command code reports failures as [`CoreError`] values; the extension
//! trait here attaches command-level context without introducing a second
//! error type.

use phasecam_core::{CoreError, CoreResult};
use std::fmt;

/// Result alias used throughout the CLI.
pub type CliResult<T> = CoreResult<T>;

/// Extension trait for adding context to errors in command code.
pub trait CliErrorContext<T> {
    /// Adds context built lazily, so the message only allocates on the
    /// error path.
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {core_error}", f()))
        })
    }
}
