//! Precomputed macro-block board orders for the 26Z dependency family.
//!
//! The grid is tiled into macro-blocks. Blocks are visited along block
//! anti-diagonals, top-right block first, and each block is emitted as
//! outward L-shaped rings growing from its top-left cell. For the wait-edge
//! set of the Z family (left, up-left, up) this order satisfies every edge
//! by construction, so the dispatcher replays it without per-cell checks.
//!
//! Orders are cached on the `ThreadSpace` keyed by pattern, sub-variant and
//! macro-block extent; reconfiguring any of those recomputes on next use.

use std::sync::Arc;

use smallvec::SmallVec;
use snafu::ensure;
use tracing::debug;

use threadwalk_space::dependency::CellCoord;
use threadwalk_space::pattern::{DependencyPattern, ZiDispatch};
use threadwalk_space::thread_space::{BoardKey, ThreadSpace};

use crate::error::{InvalidThreadSpaceSizeSnafu, NotBoardOrderedSnafu, Result};

/// The complete board order for `space`, computed or served from its cache.
pub fn board_order(space: &mut ThreadSpace) -> Result<Arc<[CellCoord]>> {
    let pattern = space.dependency_pattern();
    ensure!(pattern.uses_board_order(), NotBoardOrderedSnafu { pattern });
    if pattern == DependencyPattern::Wavefront26Z {
        // The fixed-variant order pairs rows and columns of blocks; odd
        // extents are configuration errors rather than clipped.
        ensure!(
            space.width() % 2 == 0 && space.height() % 2 == 0,
            InvalidThreadSpaceSizeSnafu {
                width: space.width(),
                height: space.height(),
                reason: "26Z dispatch requires even extents",
            }
        );
    }

    let variant = if pattern == DependencyPattern::Wavefront26Z { ZiDispatch::default() } else { space.zi_dispatch() };
    let key = BoardKey { pattern, variant, macro_block: space.macro_block() };
    if let Some(order) = space.cached_board(key) {
        return Ok(order);
    }

    let order: Arc<[CellCoord]> = compute(space.width(), space.height(), key.macro_block, variant).into();
    debug!(
        width = space.width(),
        height = space.height(),
        ?variant,
        cells = order.len(),
        "computed z-order board"
    );
    space.store_board(key, order.clone());
    Ok(order)
}

/// Compute the block-diagonal ring order for a `width`x`height` grid.
///
/// Edge blocks are clipped to the grid; every in-bounds cell appears exactly
/// once.
pub fn compute(width: u16, height: u16, macro_block: (u16, u16), variant: ZiDispatch) -> Vec<CellCoord> {
    let (bw, bh) = macro_block;
    let blocks_x = width.div_ceil(bw);
    let blocks_y = height.div_ceil(bh);
    let vertical_first =
        matches!(variant, ZiDispatch::VerticalSequential | ZiDispatch::VerticalInterleaved);
    let interleaved =
        matches!(variant, ZiDispatch::VerticalInterleaved | ZiDispatch::HorizontalInterleaved);

    let mut order = Vec::with_capacity(usize::from(width) * usize::from(height));

    for diagonal in 0..blocks_x + blocks_y - 1 {
        // Blocks with bx + by == diagonal, top-right block first.
        let blocks: SmallVec<[Block; 8]> = (0..blocks_x)
            .rev()
            .filter_map(|bx| {
                let by = diagonal.checked_sub(bx)?;
                (by < blocks_y).then(|| Block::clipped(bx, by, (bw, bh), width, height))
            })
            .collect();

        if interleaved {
            let rings = blocks.iter().map(Block::ring_count).max().unwrap_or(0);
            for ring in 0..rings {
                for block in &blocks {
                    block.emit_ring(ring, vertical_first, &mut order);
                }
            }
        } else {
            for block in &blocks {
                for ring in 0..block.ring_count() {
                    block.emit_ring(ring, vertical_first, &mut order);
                }
            }
        }
    }

    order
}

/// One macro-block clipped to the grid.
struct Block {
    anchor: (u16, u16),
    extent: (u16, u16),
}

impl Block {
    fn clipped(bx: u16, by: u16, macro_block: (u16, u16), width: u16, height: u16) -> Self {
        let anchor = (bx * macro_block.0, by * macro_block.1);
        let extent = ((width - anchor.0).min(macro_block.0), (height - anchor.1).min(macro_block.1));
        Self { anchor, extent }
    }

    /// Ring `r` holds the cells with `max(dx, dy) == r` from the anchor.
    fn ring_count(&self) -> u16 {
        self.extent.0.max(self.extent.1)
    }

    /// Emit ring `ring` of this block. Vertical-first orders walk the right
    /// edge top-down then the bottom edge left-right (the corner belongs to
    /// the bottom edge); horizontal-first swaps edge and corner ownership.
    fn emit_ring(&self, ring: u16, vertical_first: bool, order: &mut Vec<CellCoord>) {
        let mut push = |dx: u16, dy: u16| {
            if dx < self.extent.0 && dy < self.extent.1 {
                order.push(CellCoord::new(self.anchor.0 + dx, self.anchor.1 + dy));
            }
        };
        if vertical_first {
            for dy in 0..ring {
                push(ring, dy);
            }
            for dx in 0..=ring {
                push(dx, ring);
            }
        } else {
            for dx in 0..ring {
                push(dx, ring);
            }
            for dy in 0..=ring {
                push(ring, dy);
            }
        }
    }
}
