use std::sync::Arc;
use std::time::Duration;

use threadwalk_space::group_space::Extents3;

use crate::error::{Error, Result};
use crate::executor::{CpuPool, GroupExecutor, KernelLauncher, ThreadContext, ThreadExecutor};
use crate::test::support::{RecordingLauncher, StallingLauncher, kernel};

#[test]
fn stalled_group_work_times_out() {
    let launcher = Arc::new(StallingLauncher { delay: Duration::from_millis(50) });
    let pool = CpuPool::new(launcher, 1, 10).unwrap();

    let err = GroupExecutor::invoke(
        &pool,
        &kernel("slow", 0),
        Extents3::new(4, 1, 1),
        Extents3::new(1, 1, 1),
        64,
        64,
    )
    .unwrap_err();
    assert!(matches!(err, Error::ExecutionTimeout { expected: 4, .. }), "{err}");
}

#[test]
fn group_invoke_covers_every_thread() {
    let launcher = Arc::new(RecordingLauncher::default());
    let pool = CpuPool::new(launcher.clone(), 2, 0).unwrap();

    GroupExecutor::invoke(&pool, &kernel("fill", 0), Extents3::new(2, 2, 1), Extents3::new(3, 1, 1), 64, 64).unwrap();

    let mut ids: Vec<u32> = launcher.contexts().iter().map(|c| c.thread_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..12).collect::<Vec<_>>());
}

#[test]
fn unordered_fan_out_propagates_the_first_failure() {
    struct FailingLauncher;
    impl KernelLauncher for FailingLauncher {
        fn launch(&self, _: &threadwalk_space::kernel::KernelHandle, ctx: &ThreadContext) -> Result<()> {
            if ctx.thread_id == 3 { Err(Error::Execution { reason: "bad launch".into() }) } else { Ok(()) }
        }
    }

    let pool = CpuPool::new(Arc::new(FailingLauncher), 2, 0).unwrap();
    let err = pool.invoke_unordered(&kernel("flaky", 0), 0..8, 4).unwrap_err();
    assert!(matches!(err, Error::Execution { .. }), "{err}");
}
