//! Named hardware dispatch patterns.
//!
//! A *dependency pattern* names a predecessor-vector set implying data
//! dependencies between neighboring cells. A *walking pattern* names a total
//! visitation order matching a specific hardware dispatch unit. The two are
//! mutually exclusive on a thread space: a dependency pattern lets the
//! scheduler derive an order, a walking pattern imposes one directly.

use crate::dependency::DependencyVectorSet;

/// Named predecessor-vector sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum DependencyPattern {
    /// No inter-cell dependencies.
    #[default]
    None,
    /// Each cell waits on its left neighbor.
    HorizontalWave,
    /// Each cell waits on the cell above.
    VerticalWave,
    /// 45-degree anti-diagonal front: left and above.
    Wavefront,
    /// 26-degree front: left, up-left, up, up-right.
    Wavefront26,
    /// 26-degree front dispatched in precomputed macro-block order.
    Wavefront26Z,
    /// 26-degree front with selectable macro-block sub-order.
    Wavefront26Zi,
    /// 26-degree front with zig-zag row pairing.
    Wavefront26Zig,
    /// 26-degree front with doubled row stride.
    Wavefront26X,
}

impl DependencyPattern {
    /// The canonical wait-edge set for this pattern.
    ///
    /// The Z-block family omits the up-right edge of the 26 neighborhood:
    /// that edge is owned by the paired-row hardware dispatch the
    /// precomputed block order replaces, and the block order guarantees the
    /// remaining edges by construction.
    pub fn vectors(&self) -> DependencyVectorSet {
        let offsets: &[(i8, i8)] = match self {
            Self::None => &[],
            Self::HorizontalWave => &[(-1, 0)],
            Self::VerticalWave => &[(0, -1)],
            Self::Wavefront => &[(-1, 0), (0, -1)],
            Self::Wavefront26 | Self::Wavefront26Zig | Self::Wavefront26X => {
                &[(-1, 0), (-1, -1), (0, -1), (1, -1)]
            }
            Self::Wavefront26Z | Self::Wavefront26Zi => &[(-1, 0), (-1, -1), (0, -1)],
        };
        // Offsets above are all non-zero and within capacity.
        DependencyVectorSet::from_offsets(offsets).unwrap_or_default()
    }

    /// Whether the pattern's order is replayed from a precomputed board order.
    pub fn uses_board_order(&self) -> bool {
        matches!(self, Self::Wavefront26Z | Self::Wavefront26Zi)
    }
}

/// Named total-order traversals of the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum WalkingPattern {
    /// No explicit walking order selected.
    #[default]
    Default,
    /// Row-major.
    Horizontal,
    /// Column-major.
    Vertical,
    /// 45-degree anti-diagonal sweep.
    Wavefront,
    /// 26-degree diagonal sweep.
    Wavefront26,
    /// 26-degree sweep with doubled row stride.
    Wavefront26X,
    /// 26-degree zig-zag sweep.
    Wavefront26ZigZag,
    /// 45-degree sweep, alternate start corner.
    Wavefront45Degree,
    /// 45-degree dual-direction sweep.
    Wavefront45XDegree,
}

impl WalkingPattern {
    /// Patterns whose step records are verified against hardware fixtures.
    ///
    /// The remaining step tables must be reconstructed from dispatch
    /// documentation before they can be offered; selecting one fails at
    /// configuration time rather than guessing the order.
    pub fn has_verified_record(&self) -> bool {
        matches!(self, Self::Default | Self::Horizontal | Self::Vertical | Self::Wavefront | Self::Wavefront26)
    }
}

/// Precomputed-order sub-variants for `Wavefront26Zi`.
///
/// The variant selects the in-block edge order (vertical-then-horizontal or
/// horizontal-then-vertical) and whether blocks on one block-diagonal are
/// emitted block-sequentially or ring-interleaved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum ZiDispatch {
    /// Vertical edge first, one block at a time.
    #[default]
    VerticalSequential,
    /// Horizontal edge first, one block at a time.
    HorizontalSequential,
    /// Vertical edge first, rings interleaved across the block diagonal.
    VerticalInterleaved,
    /// Horizontal edge first, rings interleaved across the block diagonal.
    HorizontalInterleaved,
}
