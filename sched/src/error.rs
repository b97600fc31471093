//! Scheduling-time errors.

use snafu::Snafu;
use threadwalk_space::pattern::{DependencyPattern, WalkingPattern};

/// Result type for scheduling operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while ordering or executing a thread space.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The relaxation made no progress while cells remained blocked.
    ///
    /// Side effects of the `executed` cells are observable and not rolled
    /// back; hardware stalls the same way.
    #[snafu(display("scoreboard deadlock: {executed} cells executed, {blocked} blocked with unsatisfied dependencies"))]
    Deadlock { executed: usize, blocked: usize },

    /// The grid shape is incompatible with the requested precomputed order.
    #[snafu(display("invalid thread space size {width}x{height}: {reason}"))]
    InvalidThreadSpaceSize { width: u16, height: u16, reason: String },

    /// No verified step record exists for the pattern.
    #[snafu(display("no verified walk record for {pattern:?}"))]
    MissingWalkRecord { pattern: WalkingPattern },

    /// The dependency pattern does not use a precomputed board order.
    #[snafu(display("{pattern:?} is not dispatched from a precomputed board order"))]
    NotBoardOrdered { pattern: DependencyPattern },

    /// A per-cell invocation delegated to the executor collaborator failed.
    #[snafu(display("work-item invocation failed: {reason}"))]
    Invoke { reason: String },

    /// Grid bookkeeping error from the data model.
    #[snafu(display("thread space error: {source}"))]
    Space { source: threadwalk_space::error::Error },
}
