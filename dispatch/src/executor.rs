//! Executor collaborators and the default rayon-backed CPU pool.
//!
//! The dispatcher never runs kernel code itself: every invocation crosses
//! one of the two executor traits. `CpuPool` implements both on a dedicated
//! rayon pool, delegating the actual launch to a `KernelLauncher` (the
//! marshaling subsystem supplies one). Completion of detached fan-out is
//! observed through `CompletionSignal`, a monotonic counter with a condvar
//! and a bounded wait.

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use snafu::ensure;
use tracing::trace;

use threadwalk_space::dependency::CellCoord;
use threadwalk_space::group_space::Extents3;
use threadwalk_space::kernel::KernelHandle;

use crate::error::{ExecutionTimeoutSnafu, Result};

/// Explicit per-invocation context; executors receive no ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadContext {
    pub thread_id: u32,
    /// Scoreboard origin of the invoking cell, when grid-dispatched.
    pub origin: Option<CellCoord>,
    pub color: u32,
}

/// The marshaling boundary: binds arguments and calls the entry point.
pub trait KernelLauncher: Send + Sync {
    fn launch(&self, kernel: &KernelHandle, ctx: &ThreadContext) -> Result<()>;
}

/// Per-thread invocation collaborator for the walked cell model.
pub trait ThreadExecutor: Send + Sync {
    /// Invoke one work-item; ordering is the caller's responsibility.
    fn invoke(&self, kernel: &KernelHandle, ctx: ThreadContext) -> Result<()>;

    /// Invoke a range of independent work-items with no ordering guarantee,
    /// fanning out up to `limit` at a time.
    fn invoke_unordered(&self, kernel: &KernelHandle, ids: Range<u32>, limit: u32) -> Result<()>;
}

/// Whole-group invocation collaborator for the group-dispatch model.
pub trait GroupExecutor: Send + Sync {
    fn invoke(
        &self,
        kernel: &KernelHandle,
        group_extents: Extents3,
        thread_extents: Extents3,
        resident_group_limit: u32,
        parallel_thread_limit: u32,
    ) -> Result<()>;
}

/// Monotonic completion counter with condvar waiting.
#[derive(Debug, Default)]
pub struct CompletionSignal {
    completed: AtomicU64,
    mutex: Mutex<()>,
    condvar: Condvar,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Record `n` completed units and wake waiters.
    pub fn add(&self, n: u64) {
        self.completed.fetch_add(n, Ordering::Release);
        self.condvar.notify_all();
    }

    /// Block until `expected` units completed, at most `timeout_ms`
    /// milliseconds (0 waits forever).
    pub fn wait(&self, expected: u64, timeout_ms: u64) -> Result<()> {
        if self.completed.load(Ordering::Acquire) >= expected {
            return Ok(());
        }

        let mut guard = self.mutex.lock();
        if timeout_ms == 0 {
            while self.completed.load(Ordering::Acquire) < expected {
                self.condvar.wait(&mut guard);
            }
            return Ok(());
        }

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        while self.completed.load(Ordering::Acquire) < expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            ensure!(
                !remaining.is_zero(),
                ExecutionTimeoutSnafu { waited_ms: timeout_ms, completed: self.completed(), expected }
            );
            self.condvar.wait_for(&mut guard, remaining);
        }
        Ok(())
    }
}

/// Default CPU implementation of both executor traits.
///
/// Ordered invocations are direct calls on the dispatching thread.
/// Unordered and group work fans out on a dedicated rayon pool; group
/// completion is waited with the configured bound.
pub struct CpuPool {
    launcher: Arc<dyn KernelLauncher>,
    pool: rayon::ThreadPool,
    timeout_ms: u64,
}

impl CpuPool {
    /// A pool of `threads` workers waiting at most `timeout_ms` (0 = forever)
    /// for detached group work.
    pub fn new(launcher: Arc<dyn KernelLauncher>, threads: usize, timeout_ms: u64) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("threadwalk-{i}"))
            .build()
            .map_err(|e| crate::error::Error::Execution { reason: format!("worker pool construction failed: {e}") })?;
        Ok(Self { launcher, pool, timeout_ms })
    }
}

impl ThreadExecutor for CpuPool {
    fn invoke(&self, kernel: &KernelHandle, ctx: ThreadContext) -> Result<()> {
        self.launcher.launch(kernel, &ctx)
    }

    fn invoke_unordered(&self, kernel: &KernelHandle, ids: Range<u32>, limit: u32) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        // One spawn per fan-out slot, each walking a contiguous id chunk.
        let total = ids.len();
        let chunk = total.div_ceil(limit.max(1) as usize);
        let failures: Mutex<Vec<crate::error::Error>> = Mutex::new(Vec::new());

        self.pool.scope(|s| {
            let mut next = ids.start;
            while next < ids.end {
                let chunk_end = ids.end.min(next + chunk as u32);
                let (failures, launcher) = (&failures, &self.launcher);
                s.spawn(move |_| {
                    for thread_id in next..chunk_end {
                        let ctx = ThreadContext { thread_id, origin: None, color: 0 };
                        if let Err(e) = launcher.launch(kernel, &ctx) {
                            failures.lock().push(e);
                            return;
                        }
                    }
                });
                next = chunk_end;
            }
        });

        trace!(total, limit, "unordered fan-out complete");
        match failures.into_inner().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl GroupExecutor for CpuPool {
    fn invoke(
        &self,
        kernel: &KernelHandle,
        group_extents: Extents3,
        thread_extents: Extents3,
        _resident_group_limit: u32,
        _parallel_thread_limit: u32,
    ) -> Result<()> {
        let groups = group_extents.count();
        let threads_per_group = thread_extents.count();
        if groups == 0 || threads_per_group == 0 {
            return Ok(());
        }

        // Groups are detached onto the pool and completion is observed
        // through the signal, so a stuck launch surfaces as a timeout
        // rather than a hang.
        let signal = Arc::new(CompletionSignal::new());
        let failures: Arc<Mutex<Vec<crate::error::Error>>> = Arc::new(Mutex::new(Vec::new()));

        for group in 0..groups {
            let (kernel, signal, failures) = (kernel.clone(), signal.clone(), failures.clone());
            let launcher = self.launcher.clone();
            self.pool.spawn(move || {
                for local in 0..threads_per_group {
                    let thread_id = (group * threads_per_group + local) as u32;
                    let ctx = ThreadContext { thread_id, origin: None, color: 0 };
                    if let Err(e) = launcher.launch(&kernel, &ctx) {
                        failures.lock().push(e);
                        break;
                    }
                }
                signal.add(1);
            });
        }

        signal.wait(groups, self.timeout_ms)?;
        let mut failures = failures.lock();
        match failures.drain(..).next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
