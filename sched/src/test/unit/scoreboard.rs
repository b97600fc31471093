use strum::IntoEnumIterator;
use test_case::test_case;

use threadwalk_space::dependency::{CellCoord, DependencyVectorSet};
use threadwalk_space::pattern::DependencyPattern;
use threadwalk_space::thread_space::ThreadSpace;

use crate::error::Error;
use crate::scoreboard::{ScoreboardRun, execute};
use crate::test::support::stub_kernel;
use crate::test::unit::{assert_dependency_order, assert_permutation};

fn run(space: &mut ThreadSpace) -> crate::Result<ScoreboardRun> {
    space.init_dependency();
    execute(space, |_| Ok(()))
}

#[test]
fn mutual_wait_deadlocks_without_progress() {
    let mut space = ThreadSpace::create(3, 1).unwrap();
    space.set_dependency_pattern(DependencyVectorSet::from_offsets(&[(1, 0), (-1, 0)]).unwrap()).unwrap();
    let err = run(&mut space).unwrap_err();
    assert!(matches!(err, Error::Deadlock { executed: 0, blocked: 3 }), "{err}");
}

#[test]
fn deadlock_preserves_partial_progress() {
    // Mutual left/right waits everywhere, except the first cell is unmasked
    // and runs free. Its completion unblocks nothing permanently: the
    // remaining pair still waits on each other.
    let mut space = ThreadSpace::create(3, 1).unwrap();
    space.set_dependency_pattern(DependencyVectorSet::from_offsets(&[(1, 0), (-1, 0)]).unwrap()).unwrap();
    space.associate_thread_with_mask(CellCoord::new(0, 0), stub_kernel(), 0, 0).unwrap();

    let mut invoked = Vec::new();
    space.init_dependency();
    let err = execute(&mut space, |c| {
        invoked.push(c);
        Ok(())
    })
    .unwrap_err();

    assert_eq!(invoked, vec![CellCoord::new(0, 0)]);
    assert!(matches!(err, Error::Deadlock { executed: 1, blocked: 2 }), "{err}");
}

#[test]
fn against_sweep_wave_takes_one_pass_per_front() {
    // Each cell waits on the cell below it; the row-major sweep satisfies
    // exactly one row per pass, bottom-up.
    let mut space = ThreadSpace::create(1, 4).unwrap();
    space.set_dependency_pattern(DependencyVectorSet::from_offsets(&[(0, 1)]).unwrap()).unwrap();
    let result = run(&mut space).unwrap();
    assert_eq!(result.passes, 5);
    let ys: Vec<u16> = result.order.iter().map(|c| c.y).collect();
    assert_eq!(ys, vec![3, 2, 1, 0]);
}

#[test]
fn along_sweep_wave_drains_in_one_pass() {
    let mut space = ThreadSpace::create(4, 4).unwrap();
    space.select_dependency_pattern(DependencyPattern::Wavefront).unwrap();
    let result = run(&mut space).unwrap();
    assert_eq!(result.passes, 2);
}

#[test]
fn invocation_error_aborts_the_run() {
    let mut space = ThreadSpace::create(2, 2).unwrap();
    space.init_dependency();
    let mut invoked = 0;
    let err = execute(&mut space, |_| {
        invoked += 1;
        if invoked == 2 { Err(Error::Invoke { reason: "launch refused".into() }) } else { Ok(()) }
    })
    .unwrap_err();
    assert!(matches!(err, Error::Invoke { .. }));
    assert_eq!(invoked, 2);
}

#[test_case(6, 4 ; "even grid")]
#[test_case(5, 3 ; "odd grid")]
#[test_case(1, 7 ; "single column")]
fn every_named_pattern_drains_legally(width: u16, height: u16) {
    for pattern in DependencyPattern::iter() {
        let mut space = ThreadSpace::create(width, height).unwrap();
        space.select_dependency_pattern(pattern).unwrap();
        let result = run(&mut space).unwrap();
        assert_permutation(&result.order, width, height);
        assert_dependency_order(&result.order, space.vectors(), width, height);
    }
}

#[test]
fn rerun_after_reinit_reproduces_the_order() {
    let mut space = ThreadSpace::create(5, 4).unwrap();
    space.select_dependency_pattern(DependencyPattern::Wavefront26).unwrap();
    let first = run(&mut space).unwrap();
    let second = run(&mut space).unwrap();
    assert_eq!(first, second);
}
