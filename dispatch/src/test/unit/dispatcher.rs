use std::sync::Arc;

use test_case::test_case;

use threadwalk_space::dependency::{CellCoord, DependencyVectorSet};
use threadwalk_space::pattern::{DependencyPattern, WalkingPattern};
use threadwalk_space::thread_space::ThreadSpace;

use crate::dispatcher::Strategy;
use crate::error::Error;
use crate::platform::PlatformId;
use crate::task::Task;
use crate::test::support::{RecordingLauncher, dispatcher, kernel, per_thread_kernel};

#[test]
fn missing_work_item_fails_integrity() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher);

    let kernel = kernel("conv", 4);
    let mut task = Task::new();
    task.add_kernel(kernel.clone());

    let mut space = ThreadSpace::create(2, 2).unwrap();
    for thread_id in 0..3u16 {
        space.associate_thread(CellCoord::new(thread_id, 0), kernel.clone(), u32::from(thread_id)).unwrap();
    }

    assert!(!dispatcher.integrity_check(&task, &space));
    let err = dispatcher.enqueue(&task, Some(&mut space)).unwrap_err();
    assert!(matches!(err, Error::InvalidThreadSpace { declared: 4, associated: 3, .. }), "{err}");
}

#[test]
fn horizontal_wave_replays_row_major() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher.clone());

    let kernel = kernel("scale", 4);
    let mut task = Task::new();
    task.add_kernel(kernel.clone());

    let mut space = ThreadSpace::create(4, 1).unwrap();
    space.select_dependency_pattern(DependencyPattern::HorizontalWave).unwrap();
    for thread_id in 0..4u16 {
        space.associate_thread(CellCoord::new(thread_id, 0), kernel.clone(), u32::from(thread_id)).unwrap();
    }

    let report = dispatcher.enqueue(&task, Some(&mut space)).unwrap();
    assert_eq!(report.strategy, Strategy::WalkerRun);
    assert_eq!(report.invocations, 4);

    let ids: Vec<u32> = launcher.contexts().iter().map(|c| c.thread_id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert!(launcher.contexts().iter().all(|c| c.origin.is_some()));
}

#[test]
fn custom_vector_sets_relax_through_the_scoreboard() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher.clone());

    let mut task = Task::new();
    task.add_kernel(kernel("blur", 0));

    let mut space = ThreadSpace::create(3, 3).unwrap();
    space.set_dependency_pattern(DependencyVectorSet::from_offsets(&[(-1, -1)]).unwrap()).unwrap();

    let report = dispatcher.enqueue(&task, Some(&mut space)).unwrap();
    assert_eq!(report.strategy, Strategy::ScoreboardRun);
    assert_eq!(report.invocations, 9);
}

#[test]
fn z_family_replays_the_precomputed_board() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher.clone());

    let mut task = Task::new();
    task.add_kernel(kernel("deblock", 0));

    let mut space = ThreadSpace::create(4, 4).unwrap();
    space.select_dependency_pattern(DependencyPattern::Wavefront26Z).unwrap();

    let report = dispatcher.enqueue(&task, Some(&mut space)).unwrap();
    assert_eq!(report.strategy, Strategy::ZOrderRun);
    assert_eq!(report.invocations, 16);
}

#[test]
fn odd_grid_for_26z_fails() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher);

    let mut task = Task::new();
    task.add_kernel(kernel("deblock", 0));

    let mut space = ThreadSpace::create(5, 4).unwrap();
    space.select_dependency_pattern(DependencyPattern::Wavefront26Z).unwrap();
    let err = dispatcher.enqueue(&task, Some(&mut space)).unwrap_err();
    assert!(matches!(err, Error::Sched { .. }), "{err}");
}

#[test]
fn no_space_no_per_thread_args_runs_unordered() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher.clone());

    let mut task = Task::new();
    task.add_kernel(kernel("reduce", 6));

    let report = dispatcher.enqueue(&task, None).unwrap();
    assert_eq!(report.strategy, Strategy::EmbarrassinglyParallel);
    assert_eq!(report.invocations, 6);

    let mut ids: Vec<u32> = launcher.contexts().iter().map(|c| c.thread_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn per_thread_args_get_an_implicit_space() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher.clone());

    let mut task = Task::new();
    task.add_kernel(per_thread_kernel("histogram", 5));

    let report = dispatcher.enqueue(&task, None).unwrap();
    assert_eq!(report.strategy, Strategy::WalkerRun);
    assert_eq!(report.invocations, 5);

    // Ordered, not merely covering.
    let ids: Vec<u32> = launcher.contexts().iter().map(|c| c.thread_id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn group_platform_submits_whole_groups() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Xe, launcher.clone());

    let mut task = Task::new();
    task.add_kernel(kernel("matmul", 0));

    let mut space = ThreadSpace::create(3, 2).unwrap();
    let report = dispatcher.enqueue(&task, Some(&mut space)).unwrap();
    assert_eq!(report.strategy, Strategy::GroupDispatch);
    assert_eq!(report.invocations, 6);

    // Group dispatch performs no per-cell scheduling: no origins.
    assert!(launcher.contexts().iter().all(|c| c.origin.is_none()));
}

#[test]
fn group_platform_derives_extents_from_declared_count() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Xe, launcher.clone());

    let mut task = Task::new();
    task.add_kernel(kernel("fill", 7));

    let report = dispatcher.enqueue(&task, None).unwrap();
    assert_eq!(report.strategy, Strategy::GroupDispatch);
    assert_eq!(report.invocations, 7);
    assert_eq!(launcher.contexts().len(), 7);
}

#[test]
fn walker_limit_is_tighter_than_media_object() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher);

    let mut task = Task::new();
    task.add_kernel(kernel("wide", 0));

    // 512 wide is fine for the per-object model but over the walker bound.
    let mut space = ThreadSpace::create(512, 1).unwrap();
    let report = dispatcher.enqueue(&task, Some(&mut space)).unwrap();
    assert_eq!(report.strategy, Strategy::ScoreboardRun);

    let mut space = ThreadSpace::create(512, 1).unwrap();
    space.select_walking_pattern(WalkingPattern::Horizontal).unwrap();
    let err = dispatcher.enqueue(&task, Some(&mut space)).unwrap_err();
    assert!(matches!(err, Error::ThreadSpaceSizeExceeded { max_width: 511, .. }), "{err}");
}

#[test]
fn color_count_repeats_the_walk() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher.clone());

    let mut task = Task::new();
    task.add_kernel(kernel("denoise", 0));

    let mut space = ThreadSpace::create(2, 2).unwrap();
    space.select_walking_pattern(WalkingPattern::Wavefront).unwrap();
    space.set_color_count(3).unwrap();

    let report = dispatcher.enqueue(&task, Some(&mut space)).unwrap();
    assert_eq!(report.strategy, Strategy::WalkerRun);
    assert_eq!(report.invocations, 12);

    let colors: Vec<u32> = launcher.contexts().iter().map(|c| c.color).collect();
    assert_eq!(colors, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);
}

#[test_case(DependencyPattern::HorizontalWave, Strategy::WalkerRun ; "horizontal wave walks")]
#[test_case(DependencyPattern::Wavefront, Strategy::WalkerRun ; "wavefront walks")]
#[test_case(DependencyPattern::Wavefront26Z, Strategy::ZOrderRun ; "26z replays the board")]
#[test_case(DependencyPattern::Wavefront26Zi, Strategy::ZOrderRun ; "26zi replays the board")]
#[test_case(DependencyPattern::Wavefront26X, Strategy::ScoreboardRun ; "26x falls back to relaxation")]
#[test_case(DependencyPattern::Wavefront26Zig, Strategy::ScoreboardRun ; "26zig falls back to relaxation")]
#[test_case(DependencyPattern::None, Strategy::ScoreboardRun ; "no pattern relaxes trivially")]
fn dependency_pattern_selects_strategy(pattern: DependencyPattern, expected: Strategy) {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher);

    let mut task = Task::new();
    task.add_kernel(kernel("stage", 0));

    let mut space = ThreadSpace::create(4, 4).unwrap();
    space.select_dependency_pattern(pattern).unwrap();
    let report = dispatcher.enqueue(&task, Some(&mut space)).unwrap();
    assert_eq!(report.strategy, expected);
    assert_eq!(report.invocations, 16);
}

#[test]
fn empty_task_dispatches_nothing() {
    let launcher = Arc::new(RecordingLauncher::default());
    let dispatcher = dispatcher(PlatformId::Gen12, launcher.clone());

    let report = dispatcher.enqueue(&Task::new(), None).unwrap();
    assert_eq!(report.invocations, 0);
    assert!(launcher.contexts().is_empty());
}
