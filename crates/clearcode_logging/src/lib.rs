#![deny(missing_docs)]
//! Shared logging utilities for the clearcode workspace.
//!
//! This crate provides the `clear_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every message goes
//! to the `clearcode` target and carries the id of the clearing run that is
//! currently executing on this thread, so interleaved runs stay readable.

use std::cell::Cell;

/// Log target shared by every `clear_*` macro.
pub const TARGET: &str = "clearcode";

thread_local! {
    /// Id of the clearing run currently executing on this thread (0 = none).
    static CURRENT_RUN: Cell<u64> = const { Cell::new(0) };
}

/// Sets the run id for the current thread.
/// The orchestrator calls this at the start of every scheduled step.
pub fn set_current_run(run_id: u64) {
    CURRENT_RUN.with(|v| v.set(run_id));
}

/// Retrieves the run id for the current thread.
/// Returns 0 outside of a clearing run.
pub fn current_run() -> u64 {
    CURRENT_RUN.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! clear_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, "[run {}] {}", $crate::current_run(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! clear_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, "[run {}] {}", $crate::current_run(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! clear_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, "[run {}] {}", $crate::current_run(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! clear_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, "[run {}] {}", $crate::current_run(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! clear_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, "[run {}] {}", $crate::current_run(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
