//! The grid descriptor: per-cell state, pattern selection, board-order cache.
//!
//! A `ThreadSpace` is created once per enqueue (or reused by the owning
//! kernel), mutated only between creation and the scheduler run, and never
//! shared across concurrently executing runs. Pending-dependency counters
//! are initialized by `init_dependency` and mutated only by the scheduler.

use std::sync::Arc;

use snafu::ensure;
use tracing::trace;

use crate::dependency::{CellCoord, DependencyVectorSet};
use crate::error::{ConflictingPatternSelectionSnafu, Error, Result};
use crate::group_space::{GroupLimits, ThreadGroupSpace};
use crate::kernel::KernelHandle;
use crate::pattern::{DependencyPattern, WalkingPattern, ZiDispatch};

/// Every vector bit enabled.
pub const FULL_DEPENDENCY_MASK: u8 = 0xff;

/// Hardware scoreboards track at most 16 color values.
pub const MAX_COLOR_COUNT: u32 = 16;

/// Default macro-block extent for the precomputed Z-order family.
pub const DEFAULT_MACRO_BLOCK: (u16, u16) = (8, 8);

/// One grid cell: at most one work-item assignment.
#[derive(Debug, Clone)]
pub struct Cell {
    kernel: Option<KernelHandle>,
    thread_id: u32,
    pending: u8,
    dependency_mask: u8,
    scoreboard: Option<CellCoord>,
}

impl Default for Cell {
    fn default() -> Self {
        Self { kernel: None, thread_id: 0, pending: 0, dependency_mask: FULL_DEPENDENCY_MASK, scoreboard: None }
    }
}

impl Cell {
    /// The kernel handle assigned to this cell, if any.
    pub fn kernel(&self) -> Option<&KernelHandle> {
        self.kernel.as_ref()
    }

    pub fn thread_id(&self) -> u32 {
        self.thread_id
    }

    /// Not-yet-satisfied predecessor edges.
    pub fn pending(&self) -> u8 {
        self.pending
    }

    /// Bit `i` enables the `i`-th configured dependency vector for this cell.
    pub fn dependency_mask(&self) -> u8 {
        self.dependency_mask
    }

    /// Scoreboard coordinate handed to the executor as the thread origin.
    pub fn scoreboard(&self) -> Option<CellCoord> {
        self.scoreboard
    }
}

/// Cache identity for a precomputed board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardKey {
    pub pattern: DependencyPattern,
    pub variant: ZiDispatch,
    pub macro_block: (u16, u16),
}

/// Grid of work-item slots plus the selected dispatch pattern.
#[derive(Debug, Clone)]
pub struct ThreadSpace {
    width: u16,
    height: u16,
    color_count: u32,
    cells: Vec<Cell>,
    dependency_pattern: DependencyPattern,
    walking_pattern: WalkingPattern,
    vectors: DependencyVectorSet,
    zi_dispatch: ZiDispatch,
    macro_block: (u16, u16),
    board_cache: Option<(BoardKey, Arc<[CellCoord]>)>,
    group_space: Option<Arc<ThreadGroupSpace>>,
}

impl ThreadSpace {
    /// Create an empty `width`x`height` space with no pattern selected.
    pub fn create(width: u16, height: u16) -> Result<Self> {
        ensure!(width >= 1 && height >= 1, crate::error::ZeroThreadSpaceDimSnafu { width, height });
        let cells = vec![Cell::default(); usize::from(width) * usize::from(height)];
        Ok(Self {
            width,
            height,
            color_count: 1,
            cells,
            dependency_pattern: DependencyPattern::None,
            walking_pattern: WalkingPattern::Default,
            vectors: DependencyVectorSet::new(),
            zi_dispatch: ZiDispatch::default(),
            macro_block: DEFAULT_MACRO_BLOCK,
            board_cache: None,
            group_space: None,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total cell count.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn color_count(&self) -> u32 {
        self.color_count
    }

    pub fn dependency_pattern(&self) -> DependencyPattern {
        self.dependency_pattern
    }

    pub fn walking_pattern(&self) -> WalkingPattern {
        self.walking_pattern
    }

    /// The configured wait-edge set (named or custom).
    pub fn vectors(&self) -> &DependencyVectorSet {
        &self.vectors
    }

    pub fn zi_dispatch(&self) -> ZiDispatch {
        self.zi_dispatch
    }

    pub fn macro_block(&self) -> (u16, u16) {
        self.macro_block
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    fn index(&self, coord: CellCoord) -> Result<usize> {
        ensure!(
            self.contains(coord),
            crate::error::CellOutOfBoundsSnafu { x: coord.x, y: coord.y, width: self.width, height: self.height }
        );
        Ok(coord.linear(self.width))
    }

    pub fn cell(&self, coord: CellCoord) -> Result<&Cell> {
        let index = self.index(coord)?;
        Ok(&self.cells[index])
    }

    /// Iterate cells row-major with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &Cell)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (CellCoord::new((i % usize::from(width)) as u16, (i / usize::from(width)) as u16), cell))
    }

    /// Assign a work-item to a cell with every dependency vector enabled.
    pub fn associate_thread(&mut self, coord: CellCoord, kernel: KernelHandle, thread_id: u32) -> Result<()> {
        self.associate_thread_with_mask(coord, kernel, thread_id, FULL_DEPENDENCY_MASK)
    }

    /// Assign a work-item to a cell, enabling only the masked subset of the
    /// configured dependency vectors for it.
    pub fn associate_thread_with_mask(
        &mut self,
        coord: CellCoord,
        kernel: KernelHandle,
        thread_id: u32,
        dependency_mask: u8,
    ) -> Result<()> {
        let index = self.index(coord)?;
        let cell = &mut self.cells[index];
        cell.kernel = Some(kernel);
        cell.thread_id = thread_id;
        cell.dependency_mask = dependency_mask;
        cell.scoreboard = Some(coord);
        Ok(())
    }

    /// Select a named dependency pattern, installing its canonical vectors.
    ///
    /// Mutually exclusive with a non-default walking pattern.
    pub fn select_dependency_pattern(&mut self, pattern: DependencyPattern) -> Result<()> {
        ensure!(
            pattern == DependencyPattern::None || self.walking_pattern == WalkingPattern::Default,
            ConflictingPatternSelectionSnafu
        );
        self.dependency_pattern = pattern;
        self.vectors = pattern.vectors();
        Ok(())
    }

    /// Install a custom wait-edge set (capacity and null checks already done
    /// by `DependencyVectorSet`). Mutually exclusive with a walking pattern.
    pub fn set_dependency_pattern(&mut self, vectors: DependencyVectorSet) -> Result<()> {
        ensure!(
            vectors.is_empty() || self.walking_pattern == WalkingPattern::Default,
            ConflictingPatternSelectionSnafu
        );
        self.dependency_pattern = DependencyPattern::None;
        self.vectors = vectors;
        Ok(())
    }

    /// Select a named walking order. Mutually exclusive with dependencies;
    /// fails for patterns whose step record is not verified.
    pub fn select_walking_pattern(&mut self, pattern: WalkingPattern) -> Result<()> {
        ensure!(
            pattern == WalkingPattern::Default
                || (self.dependency_pattern == DependencyPattern::None && self.vectors.is_empty()),
            ConflictingPatternSelectionSnafu
        );
        ensure!(pattern.has_verified_record(), crate::error::UnsupportedWalkingPatternSnafu { pattern });
        self.walking_pattern = pattern;
        Ok(())
    }

    /// Color count: each walked cell is invoked once per color value.
    pub fn set_color_count(&mut self, count: u32) -> Result<()> {
        ensure!(
            (1..=MAX_COLOR_COUNT).contains(&count),
            crate::error::ColorCountOutOfRangeSnafu { count, max: MAX_COLOR_COUNT }
        );
        self.color_count = count;
        Ok(())
    }

    /// Macro-block extent for the precomputed Z-order family.
    pub fn set_macro_block(&mut self, width: u16, height: u16) -> Result<()> {
        ensure!(width >= 1 && height >= 1, crate::error::ZeroMacroBlockDimSnafu { width, height });
        self.macro_block = (width, height);
        Ok(())
    }

    pub fn set_zi_dispatch(&mut self, variant: ZiDispatch) {
        self.zi_dispatch = variant;
    }

    /// (Re)initialize every pending-dependency counter.
    ///
    /// After this call, `pending(c)` equals the number of configured vectors
    /// that are enabled by `c`'s mask and whose target from `c` is in-bounds.
    pub fn init_dependency(&mut self) {
        let (width, height) = (self.width, self.height);
        let vectors = self.vectors.clone();
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let coord =
                CellCoord::new((i % usize::from(width)) as u16, (i / usize::from(width)) as u16);
            cell.pending = vectors
                .enumerate()
                .filter(|&(bit, v)| cell.dependency_mask & (1 << bit) != 0 && coord.offset(v, width, height).is_some())
                .count() as u8;
        }
        trace!(width, height, vectors = vectors.len(), "initialized pending dependency counters");
    }

    /// Scheduler-only: consume one satisfied predecessor edge.
    pub fn decrement_pending(&mut self, coord: CellCoord) -> Result<()> {
        let index = self.index(coord)?;
        let cell = &mut self.cells[index];
        cell.pending = cell.pending.saturating_sub(1);
        Ok(())
    }

    /// Cached board order for `key`, if the last computation matches.
    pub fn cached_board(&self, key: BoardKey) -> Option<Arc<[CellCoord]>> {
        match &self.board_cache {
            Some((cached, order)) if *cached == key => Some(order.clone()),
            _ => None,
        }
    }

    /// Replace the cached board order.
    pub fn store_board(&mut self, key: BoardKey, order: Arc<[CellCoord]>) {
        self.board_cache = Some((key, order));
    }

    /// Lazily created group-space view of this grid: `width x height x 1`
    /// groups of one thread each. Owned by this space and dropped with it.
    pub fn group_space(&mut self, limits: &GroupLimits) -> Result<Arc<ThreadGroupSpace>> {
        if let Some(existing) = &self.group_space {
            return Ok(existing.clone());
        }
        let group = ThreadGroupSpace::create()
            .limits(limits.clone())
            .thread_width(1)
            .thread_height(1)
            .thread_depth(1)
            .group_width(u32::from(self.width))
            .group_height(u32::from(self.height))
            .group_depth(1)
            .call()?;
        let group = Arc::new(group);
        self.group_space = Some(group.clone());
        Ok(group)
    }
}
