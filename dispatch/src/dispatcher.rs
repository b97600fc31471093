//! Strategy selection and the enqueue entry point.
//!
//! One dispatch is one `enqueue` call: the dispatcher picks an execution
//! model from the platform and the task, orders cells through a scheduling
//! engine where the space demands it, and crosses the executor traits for
//! every invocation. All failures surface synchronously from `enqueue`;
//! partial execution before a deadlock is observable and not rolled back.

use std::sync::Arc;

use snafu::{ResultExt, ensure};
use tracing::{debug, warn};

use threadwalk_sched::{scoreboard, walker, zorder};
use threadwalk_space::dependency::CellCoord;
use threadwalk_space::group_space::ThreadGroupSpace;
use threadwalk_space::kernel::{KernelHandle, kernel_identity};
use threadwalk_space::pattern::WalkingPattern;
use threadwalk_space::thread_space::ThreadSpace;

use crate::error::{InvalidThreadSpaceSnafu, Result, SchedSnafu, SpaceSnafu, ThreadSpaceSizeExceededSnafu};
use crate::executor::{GroupExecutor, ThreadContext, ThreadExecutor};
use crate::platform::{Platform, WalkerMode};
use crate::task::Task;

/// Execution model selected for one enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    GroupDispatch,
    EmbarrassinglyParallel,
    ScoreboardRun,
    ZOrderRun,
    WalkerRun,
}

/// What one enqueue did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub strategy: Strategy,
    pub invocations: usize,
}

/// Front door of the crate: turns tasks into executor invocations.
pub struct Dispatcher {
    platform: Arc<dyn Platform>,
    threads: Arc<dyn ThreadExecutor>,
    groups: Arc<dyn GroupExecutor>,
}

impl Dispatcher {
    pub fn new(platform: Arc<dyn Platform>, threads: Arc<dyn ThreadExecutor>, groups: Arc<dyn GroupExecutor>) -> Self {
        Self { platform, threads, groups }
    }

    /// Dispatch a task, optionally over an explicit thread space.
    pub fn enqueue(&self, task: &Task, space: Option<&mut ThreadSpace>) -> Result<DispatchReport> {
        if self.platform.supports_group_dispatch() {
            return self.dispatch_groups(task, space);
        }
        match space {
            Some(space) => self.dispatch_space(task, space),
            None if task.has_per_thread_args() => self.dispatch_implicit(task),
            None => self.dispatch_unordered(task),
        }
    }

    /// Submit an explicitly built group space, bypassing derivation.
    pub fn enqueue_with_group(&self, task: &Task, group: &ThreadGroupSpace) -> Result<DispatchReport> {
        let mut invocations = 0usize;
        for kernel in task.kernels() {
            self.groups.invoke(
                kernel,
                group.group_extents(),
                group.thread_extents(),
                self.platform.resident_group_limit(),
                self.platform.parallel_thread_limit(),
            )?;
            invocations += group.total_threads() as usize;
        }
        Ok(DispatchReport { strategy: Strategy::GroupDispatch, invocations })
    }

    /// Whether every declared work-item of the task's kernels that appear in
    /// the space is associated with a cell. Logs the first gap; never panics.
    pub fn integrity_check(&self, task: &Task, space: &ThreadSpace) -> bool {
        coverage_violation(task, space).is_none()
    }

    fn dispatch_groups(&self, task: &Task, space: Option<&mut ThreadSpace>) -> Result<DispatchReport> {
        let limits = self.platform.group_limits();
        // One group per cell when a space exists; otherwise one single-thread
        // group per declared work-item of each kernel.
        let shared = match space {
            Some(space) => Some(space.group_space(&limits).context(SpaceSnafu)?),
            None => None,
        };

        let mut invocations = 0usize;
        for kernel in task.kernels() {
            let group = match &shared {
                Some(group) => group.clone(),
                None => {
                    let count = kernel.declared_thread_count().max(1);
                    Arc::new(
                        ThreadGroupSpace::create()
                            .limits(limits.clone())
                            .thread_width(1)
                            .thread_height(1)
                            .group_width(count)
                            .group_height(1)
                            .call()
                            .context(SpaceSnafu)?,
                    )
                }
            };
            self.groups.invoke(
                kernel,
                group.group_extents(),
                group.thread_extents(),
                self.platform.resident_group_limit(),
                self.platform.parallel_thread_limit(),
            )?;
            invocations += group.total_threads() as usize;
        }

        debug!(invocations, "group dispatch complete");
        Ok(DispatchReport { strategy: Strategy::GroupDispatch, invocations })
    }

    fn dispatch_unordered(&self, task: &Task) -> Result<DispatchReport> {
        let limit = self.platform.parallel_thread_limit();
        let mut invocations = 0usize;
        for kernel in task.kernels() {
            let count = kernel.declared_thread_count().max(1);
            self.threads.invoke_unordered(kernel, 0..count, limit)?;
            invocations += count as usize;
        }
        debug!(invocations, "unordered dispatch complete");
        Ok(DispatchReport { strategy: Strategy::EmbarrassinglyParallel, invocations })
    }

    /// Kernels with per-thread arguments need a deterministic id-to-cell
    /// mapping even without a caller-provided space: each runs over an
    /// implicit dependency-free `n x 1` grid, row-major.
    fn dispatch_implicit(&self, task: &Task) -> Result<DispatchReport> {
        let max_width = self.platform.max_thread_space_width(WalkerMode::MediaObject);
        let mut invocations = 0usize;
        for kernel in task.kernels() {
            let count = kernel.declared_thread_count().max(1);
            ensure!(
                count <= u32::from(max_width),
                ThreadSpaceSizeExceededSnafu {
                    width: count.min(u32::from(u16::MAX)) as u16,
                    height: 1u16,
                    max_width,
                    max_height: self.platform.max_thread_space_height(WalkerMode::MediaObject),
                }
            );
            let mut space = ThreadSpace::create(count as u16, 1).context(SpaceSnafu)?;
            for thread_id in 0..count {
                space.associate_thread(CellCoord::new(thread_id as u16, 0), kernel.clone(), thread_id).context(SpaceSnafu)?;
            }
            let order = walker::order(&space).context(SchedSnafu)?;
            invocations += self.replay(task, &space, &order, 0)?;
        }
        debug!(invocations, "implicit-space dispatch complete");
        Ok(DispatchReport { strategy: Strategy::WalkerRun, invocations })
    }

    fn dispatch_space(&self, task: &Task, space: &mut ThreadSpace) -> Result<DispatchReport> {
        let pattern = space.dependency_pattern();
        let walker_driven = space.walking_pattern() != WalkingPattern::Default
            || walker::implied_walk(pattern).is_some()
            || pattern.uses_board_order();
        let mode = if walker_driven { WalkerMode::BeWalker } else { WalkerMode::MediaObject };

        let (max_width, max_height) =
            (self.platform.max_thread_space_width(mode), self.platform.max_thread_space_height(mode));
        ensure!(
            space.width() <= max_width && space.height() <= max_height,
            ThreadSpaceSizeExceededSnafu { width: space.width(), height: space.height(), max_width, max_height }
        );

        if let Some((kernel, declared, associated)) = coverage_violation(task, space) {
            return InvalidThreadSpaceSnafu { kernel, declared, associated }.fail();
        }

        if pattern.uses_board_order() {
            let order = zorder::board_order(space).context(SchedSnafu)?;
            let invocations = self.replay(task, space, &order, 0)?;
            debug!(invocations, "z-order dispatch complete");
            return Ok(DispatchReport { strategy: Strategy::ZOrderRun, invocations });
        }

        if walker_driven {
            let order = walker::order(space).context(SchedSnafu)?;
            let mut invocations = 0usize;
            // The whole walk repeats once per color value.
            for color in 0..space.color_count() {
                invocations += self.replay(task, space, &order, color)?;
            }
            debug!(invocations, colors = space.color_count(), "walker dispatch complete");
            return Ok(DispatchReport { strategy: Strategy::WalkerRun, invocations });
        }

        // Custom vector sets and the unverified 26-degree variants go
        // through generic relaxation.
        space.init_dependency();
        let width = space.width();
        let fallback = task.kernels().first().cloned();
        let assignments: Vec<Option<(KernelHandle, u32)>> =
            space.iter().map(|(_, cell)| cell.kernel().cloned().map(|k| (k, cell.thread_id()))).collect();

        let run = scoreboard::execute(space, |coord| {
            let (kernel, thread_id) = match &assignments[coord.linear(width)] {
                Some((kernel, thread_id)) => (kernel.clone(), *thread_id),
                None => match &fallback {
                    Some(kernel) => (kernel.clone(), coord.linear(width) as u32),
                    None => return Ok(()),
                },
            };
            self.threads
                .invoke(&kernel, ThreadContext { thread_id, origin: Some(coord), color: 0 })
                .map_err(|e| threadwalk_sched::Error::Invoke { reason: e.to_string() })
        })
        .context(SchedSnafu)?;

        debug!(invocations = run.order.len(), passes = run.passes, "scoreboard dispatch complete");
        Ok(DispatchReport { strategy: Strategy::ScoreboardRun, invocations: run.order.len() })
    }

    /// Replay a precomputed order through the thread executor. Cells with no
    /// assigned kernel fall back to the task's first kernel with their
    /// linear index as thread id; with no task kernel either they are
    /// skipped.
    fn replay(&self, task: &Task, space: &ThreadSpace, order: &[CellCoord], color: u32) -> Result<usize> {
        let fallback = task.kernels().first();
        let mut invocations = 0usize;
        for &coord in order {
            let cell = space.cell(coord).context(SpaceSnafu)?;
            let (kernel, thread_id) = match cell.kernel() {
                Some(kernel) => (kernel.clone(), cell.thread_id()),
                None => match fallback {
                    Some(kernel) => (kernel.clone(), coord.linear(space.width()) as u32),
                    None => continue,
                },
            };
            self.threads.invoke(&kernel, ThreadContext { thread_id, origin: Some(coord), color })?;
            invocations += 1;
        }
        Ok(invocations)
    }
}

/// First kernel whose declared work-items are not fully associated, with
/// its declared and associated counts. Kernels with no cells in the space
/// at all are not dispatched through it and are skipped.
fn coverage_violation(task: &Task, space: &ThreadSpace) -> Option<(String, u32, u32)> {
    for kernel in task.kernels() {
        let declared = kernel.declared_thread_count();
        if declared == 0 {
            continue;
        }
        let identity = kernel_identity(kernel);
        let mut seen = vec![false; declared as usize];
        let mut associated = 0u32;
        for (_, cell) in space.iter() {
            if let Some(assigned) = cell.kernel()
                && kernel_identity(assigned) == identity
            {
                let thread_id = cell.thread_id() as usize;
                if thread_id < seen.len() && !seen[thread_id] {
                    seen[thread_id] = true;
                    associated += 1;
                }
            }
        }
        if associated == 0 {
            continue;
        }
        if associated < declared {
            warn!(kernel = kernel.name(), declared, associated, "work-item coverage check failed");
            return Some((kernel.name().to_owned(), declared, associated));
        }
    }
    None
}
