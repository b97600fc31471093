//! Dispatch-time errors, wrapping the data-model and scheduling layers.

use snafu::Snafu;

/// Result type for dispatch operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced synchronously from `Dispatcher::enqueue`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Grid configuration error from the data model.
    #[snafu(display("thread space error: {source}"))]
    Space { source: threadwalk_space::error::Error },

    /// Ordering or relaxation error from the scheduling engines.
    #[snafu(display("scheduling error: {source}"))]
    Sched { source: threadwalk_sched::error::Error },

    /// The task's declared work-items are not fully covered by the space.
    #[snafu(display("kernel {kernel} declares {declared} work-items but only {associated} are associated"))]
    InvalidThreadSpace { kernel: String, declared: u32, associated: u32 },

    /// The grid exceeds the platform limit for the selected walker mode.
    #[snafu(display("thread space {width}x{height} exceeds platform limit {max_width}x{max_height}"))]
    ThreadSpaceSizeExceeded { width: u16, height: u16, max_width: u16, max_height: u16 },

    /// The executor did not signal completion within the configured bound.
    #[snafu(display("execution timed out after {waited_ms}ms: {completed} of {expected} units completed"))]
    ExecutionTimeout { waited_ms: u64, completed: u64, expected: u64 },

    /// A delegated kernel launch failed.
    #[snafu(display("execution failed: {reason}"))]
    Execution { reason: String },
}
