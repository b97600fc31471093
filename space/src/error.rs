//! Configuration errors for the grid data model.
//!
//! Everything in this enum is raised synchronously at configuration time,
//! before any work-item executes. Callers recover by reconfiguring.

use snafu::Snafu;

use crate::dependency::MAX_DEPENDENCY_VECTORS;

/// Result type for thread-space configuration.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while configuring a `ThreadSpace` or `ThreadGroupSpace`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Grid dimensions must be at least 1x1.
    #[snafu(display("thread space dimensions must be non-zero, got {width}x{height}"))]
    ZeroThreadSpaceDim { width: u16, height: u16 },

    /// Color count outside the supported range.
    #[snafu(display("color count {count} outside supported range 1..={max}"))]
    ColorCountOutOfRange { count: u32, max: u32 },

    /// A dependency pattern and a walking pattern were selected on the same space.
    #[snafu(display("dependency pattern and walking pattern are mutually exclusive on one thread space"))]
    ConflictingPatternSelection,

    /// The dependency vector set has a fixed capacity.
    #[snafu(display("dependency vector set holds at most {MAX_DEPENDENCY_VECTORS} vectors, got {count}"))]
    TooManyDependencyVectors { count: usize },

    /// A (0,0) vector would make a cell wait on itself.
    #[snafu(display("dependency vector must be non-zero"))]
    NullDependencyVector,

    /// The requested walking pattern has no verified step record.
    #[snafu(display("walking pattern {pattern:?} has no verified step record"))]
    UnsupportedWalkingPattern { pattern: crate::pattern::WalkingPattern },

    /// Cell coordinate outside the grid.
    #[snafu(display("cell ({x},{y}) outside {width}x{height} thread space"))]
    CellOutOfBounds { x: u16, y: u16, width: u16, height: u16 },

    /// Macro-block dimensions must be at least 1x1.
    #[snafu(display("macro block dimensions must be non-zero, got {width}x{height}"))]
    ZeroMacroBlockDim { width: u16, height: u16 },

    /// Group-space extents violate a platform limit.
    #[snafu(display("group space limit violated: {reason}"))]
    GroupSpaceLimit { reason: String },
}
