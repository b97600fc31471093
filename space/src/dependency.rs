//! Dependency vectors: which neighboring cell a cell must wait on.
//!
//! A vector `(dx, dy)` configured on a thread space means "cell `c` depends
//! on cell `c + (dx, dy)` if that cell is in-bounds". Completion of a cell
//! therefore credits every in-bounds cell at `c - (dx, dy)`.

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{Error, Result};

/// Hardware scoreboards track at most eight wait edges per cell.
pub const MAX_DEPENDENCY_VECTORS: usize = 8;

/// A 2D position in a thread space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: u16,
    pub y: u16,
}

impl CellCoord {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Offset by a dependency vector; `None` when the target leaves `width`x`height`.
    pub fn offset(&self, v: DependencyVector, width: u16, height: u16) -> Option<CellCoord> {
        let x = i32::from(self.x) + i32::from(v.dx);
        let y = i32::from(self.y) + i32::from(v.dy);
        (x >= 0 && y >= 0 && x < i32::from(width) && y < i32::from(height))
            .then(|| CellCoord::new(x as u16, y as u16))
    }

    /// Row-major linear index.
    pub fn linear(&self, width: u16) -> usize {
        usize::from(self.y) * usize::from(width) + usize::from(self.x)
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A single wait edge. `(0,0)` is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencyVector {
    pub dx: i8,
    pub dy: i8,
}

impl DependencyVector {
    pub fn new(dx: i8, dy: i8) -> Result<Self> {
        ensure!(dx != 0 || dy != 0, crate::error::NullDependencyVectorSnafu);
        Ok(Self { dx, dy })
    }

    /// The reverse edge: offset from a completed cell to a cell that waits on it.
    pub const fn reversed(&self) -> DependencyVector {
        DependencyVector { dx: -self.dx, dy: -self.dy }
    }
}

/// Ordered, fixed-capacity set of wait edges.
///
/// Insertion order is irrelevant to scheduling semantics but fixed at
/// configuration time: bit `i` of a cell's dependency mask refers to the
/// `i`-th vector of this set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyVectorSet {
    vectors: SmallVec<[DependencyVector; MAX_DEPENDENCY_VECTORS]>,
}

impl DependencyVectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from `(dx, dy)` pairs, validating each.
    pub fn from_offsets(offsets: &[(i8, i8)]) -> Result<Self> {
        let mut set = Self::new();
        for &(dx, dy) in offsets {
            set.push(DependencyVector::new(dx, dy)?)?;
        }
        Ok(set)
    }

    /// Append a vector, failing once the hardware capacity is exceeded.
    pub fn push(&mut self, vector: DependencyVector) -> Result<()> {
        ensure!(
            self.vectors.len() < MAX_DEPENDENCY_VECTORS,
            crate::error::TooManyDependencyVectorsSnafu { count: self.vectors.len() + 1 }
        );
        self.vectors.push(vector);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = DependencyVector> + '_ {
        self.vectors.iter().copied()
    }

    /// Iterate `(bit index, vector)` pairs for mask filtering.
    pub fn enumerate(&self) -> impl Iterator<Item = (u8, DependencyVector)> + '_ {
        self.vectors.iter().enumerate().map(|(i, v)| (i as u8, *v))
    }
}
