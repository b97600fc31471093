//! Generic dependency-relaxation scheduler over the wait-count graph.
//!
//! The scoreboard repeatedly sweeps the grid in row-major passes. Every
//! cell whose pending-dependency counter has reached zero is invoked, then
//! its completion credits every in-bounds cell that waits on it. Credits
//! land immediately, so a wave that travels in sweep direction drains in a
//! single pass while a wave against sweep direction takes one pass per
//! front. A pass that invokes nothing while cells remain blocked means the
//! wait graph is unsatisfiable: the run fails with `Deadlock`, and whatever
//! already executed stays executed.

use snafu::{ResultExt, ensure};
use tracing::debug;

use threadwalk_space::dependency::CellCoord;
use threadwalk_space::thread_space::ThreadSpace;

use crate::error::{DeadlockSnafu, Result, SpaceSnafu};

/// Outcome of a completed relaxation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardRun {
    /// Cells in invocation order; always covers the whole grid on success.
    pub order: Vec<CellCoord>,
    /// Full-grid passes taken, including the final empty pass.
    pub passes: usize,
}

/// Execute every cell of `space`, honoring dependencies, or fail with
/// `Deadlock`.
///
/// `space` must have its pending counters initialized via
/// `init_dependency`; counters are consumed by the run, so re-initialize
/// before running again. Invocation is delegated to `invoke` (the external
/// per-thread executor boundary); an invocation error aborts the run
/// immediately.
pub fn execute<F>(space: &mut ThreadSpace, mut invoke: F) -> Result<ScoreboardRun>
where
    F: FnMut(CellCoord) -> Result<()>,
{
    let (width, height) = (space.width(), space.height());
    let total = space.len();
    let vectors = space.vectors().clone();

    let mut consumed = vec![false; total];
    let mut order = Vec::with_capacity(total);
    let mut passes = 0usize;

    loop {
        passes += 1;
        let mut executed_this_pass = 0usize;

        for y in 0..height {
            for x in 0..width {
                let coord = CellCoord::new(x, y);
                let index = coord.linear(width);
                if consumed[index] || space.cell(coord).context(SpaceSnafu)?.pending() != 0 {
                    continue;
                }

                invoke(coord)?;
                consumed[index] = true;
                order.push(coord);
                executed_this_pass += 1;

                // Completion of `coord` credits every in-bounds dependent:
                // the cell at `coord - v` waits on `coord` through vector
                // `v` when its mask enables that edge.
                for (bit, vector) in vectors.enumerate() {
                    let Some(dependent) = coord.offset(vector.reversed(), width, height) else {
                        continue;
                    };
                    let cell = space.cell(dependent).context(SpaceSnafu)?;
                    if cell.dependency_mask() & (1 << bit) != 0 && !consumed[dependent.linear(width)] {
                        space.decrement_pending(dependent).context(SpaceSnafu)?;
                    }
                }
            }
        }

        let blocked = total - order.len();
        debug!(pass = passes, executed = executed_this_pass, blocked, "scoreboard pass complete");

        if executed_this_pass == 0 {
            ensure!(blocked == 0, DeadlockSnafu { executed: order.len(), blocked });
            break;
        }
    }

    Ok(ScoreboardRun { order, passes })
}
