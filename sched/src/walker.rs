//! Table-driven generalized traversal reproducing named hardware dispatch
//! orders.
//!
//! Each named walking pattern is one `WalkRecord` consumed by a single
//! generic stepping loop (global-outer → global-inner → local-outer →
//! local-middle → inner run), so a pattern is a data entry rather than a
//! routine. Ordering alone guarantees dependency correctness for these
//! patterns; the dispatcher replays the produced order with no per-cell
//! checks.
//!
//! Only records verified against hardware fixture orders are offered
//! (`Horizontal`, `Vertical`, `Wavefront`, `Wavefront26`). The remaining
//! patterns of the hardware walker must have their step values
//! reconstructed from dispatch documentation before they can be added;
//! requesting one fails rather than guessing.

use tracing::trace;

use threadwalk_space::dependency::CellCoord;
use threadwalk_space::pattern::{DependencyPattern, WalkingPattern};
use threadwalk_space::thread_space::ThreadSpace;

use crate::error::{Error, Result};

/// Step vector in signed grid units.
pub type Step = (i32, i32);

/// Parameter record of one named dispatch order.
///
/// The generic engine emits an inner run at the local start position, then
/// advances the outer position `local_loop_count` times, emitting one run
/// per advance. Runs step by `local_inner_step`, skipping positions outside
/// the grid; `middle_step` replays each run `extra_middle_steps` additional
/// times at an offset (dual-direction hardware walks). The global loop
/// repeats the local walk over shifted block origins for multi-block
/// patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkRecord {
    pub start_offset: Step,
    pub local_outer_step: Step,
    pub local_inner_step: Step,
    pub local_block_size: (u16, u16),
    pub local_loop_count: u32,
    pub global_outer_step: Step,
    pub global_inner_step: Step,
    pub global_loop_count: u32,
    pub middle_step: Step,
    pub extra_middle_steps: u32,
}

impl WalkRecord {
    /// A record whose single global block covers the whole grid.
    fn single_block(width: u16, height: u16) -> Self {
        Self {
            start_offset: (0, 0),
            local_outer_step: (0, 1),
            local_inner_step: (1, 0),
            local_block_size: (width, height),
            local_loop_count: 0,
            global_outer_step: (0, 0),
            global_inner_step: (0, 0),
            global_loop_count: 1,
            middle_step: (0, 0),
            extra_middle_steps: 0,
        }
    }
}

/// The verified step record for `pattern` on a `width`x`height` grid.
pub fn walk_record(pattern: WalkingPattern, width: u16, height: u16) -> Result<WalkRecord> {
    let (w, h) = (i64::from(width), i64::from(height));
    let record = match pattern {
        WalkingPattern::Default | WalkingPattern::Horizontal => WalkRecord {
            local_outer_step: (0, 1),
            local_inner_step: (1, 0),
            local_loop_count: (h - 1) as u32,
            ..WalkRecord::single_block(width, height)
        },
        WalkingPattern::Vertical => WalkRecord {
            local_outer_step: (1, 0),
            local_inner_step: (0, 1),
            local_loop_count: (w - 1) as u32,
            ..WalkRecord::single_block(width, height)
        },
        WalkingPattern::Wavefront => WalkRecord {
            local_outer_step: (1, 0),
            local_inner_step: (-1, 1),
            local_loop_count: ((w - 1) + (h - 1)) as u32,
            ..WalkRecord::single_block(width, height)
        },
        WalkingPattern::Wavefront26 => WalkRecord {
            local_outer_step: (1, 0),
            local_inner_step: (-2, 1),
            local_loop_count: ((w - 1) + 2 * (h - 1)) as u32,
            ..WalkRecord::single_block(width, height)
        },
        other => return Err(Error::MissingWalkRecord { pattern: other }),
    };
    Ok(record)
}

/// The walking order implied by a named dependency pattern, when the
/// dependency structure matches a hardware walker.
pub fn implied_walk(pattern: DependencyPattern) -> Option<WalkingPattern> {
    match pattern {
        DependencyPattern::HorizontalWave => Some(WalkingPattern::Horizontal),
        DependencyPattern::VerticalWave => Some(WalkingPattern::Vertical),
        DependencyPattern::Wavefront => Some(WalkingPattern::Wavefront),
        DependencyPattern::Wavefront26 => Some(WalkingPattern::Wavefront26),
        _ => None,
    }
}

/// Expand a record into the total visitation order of a `width`x`height`
/// grid. Every cell appears exactly once for the verified records.
pub fn traverse(record: &WalkRecord, width: u16, height: u16) -> Vec<CellCoord> {
    let (w, h) = (i32::from(width), i32::from(height));
    // Inner runs cross the grid in at most this many steps for every
    // verified record (|dx| <= 2, |dy| <= 1).
    let run_cap = w + 2 * h + 2;
    let mut order = Vec::with_capacity(usize::from(width) * usize::from(height));

    let mut origin: Step = (0, 0);
    for _ in 0..record.global_loop_count {
        let mut outer = (origin.0 + record.start_offset.0, origin.1 + record.start_offset.1);
        for _ in 0..=record.local_loop_count {
            for middle in 0..=record.extra_middle_steps {
                let middle = middle as i32;
                let mut pos =
                    (outer.0 + middle * record.middle_step.0, outer.1 + middle * record.middle_step.1);
                let step = record.local_inner_step;
                for _ in 0..run_cap {
                    // Left the grid in the direction of travel: the run is over.
                    if (step.0 > 0 && pos.0 >= w)
                        || (step.0 < 0 && pos.0 < 0)
                        || (step.1 > 0 && pos.1 >= h)
                        || (step.1 < 0 && pos.1 < 0)
                    {
                        break;
                    }
                    if (0..w).contains(&pos.0) && (0..h).contains(&pos.1) {
                        order.push(CellCoord::new(pos.0 as u16, pos.1 as u16));
                    }
                    pos = (pos.0 + step.0, pos.1 + step.1);
                }
            }
            outer = (outer.0 + record.local_outer_step.0, outer.1 + record.local_outer_step.1);
        }
        origin = (origin.0 + record.global_inner_step.0, origin.1 + record.global_inner_step.1);
    }

    trace!(cells = order.len(), "expanded walk record");
    order
}

/// The total visitation order for `space`, from its walking pattern or the
/// walker implied by its named dependency pattern.
pub fn order(space: &ThreadSpace) -> Result<Vec<CellCoord>> {
    let pattern = match space.walking_pattern() {
        WalkingPattern::Default => implied_walk(space.dependency_pattern()).unwrap_or(WalkingPattern::Horizontal),
        explicit => explicit,
    };
    let record = walk_record(pattern, space.width(), space.height())?;
    Ok(traverse(&record, space.width(), space.height()))
}
