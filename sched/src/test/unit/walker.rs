use test_case::test_case;

use threadwalk_space::pattern::{DependencyPattern, WalkingPattern};
use threadwalk_space::thread_space::ThreadSpace;

use crate::test::unit::{assert_dependency_order, assert_permutation};
use crate::walker::{implied_walk, order, traverse, walk_record};

#[test]
fn wavefront26_fixture_3x2() {
    // Fronts x + 2y: runs start on the top row and step (-2, +1).
    let record = walk_record(WalkingPattern::Wavefront26, 3, 2).unwrap();
    let linear: Vec<usize> = traverse(&record, 3, 2).iter().map(|c| c.linear(3)).collect();
    assert_eq!(linear, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn wavefront_fixture_4x3() {
    let record = walk_record(WalkingPattern::Wavefront, 4, 3).unwrap();
    let linear: Vec<usize> = traverse(&record, 4, 3).iter().map(|c| c.linear(4)).collect();
    assert_eq!(linear, vec![0, 1, 4, 2, 5, 8, 3, 6, 9, 7, 10, 11]);
}

#[test_case(WalkingPattern::Horizontal ; "horizontal")]
#[test_case(WalkingPattern::Vertical ; "vertical")]
#[test_case(WalkingPattern::Wavefront ; "wavefront")]
#[test_case(WalkingPattern::Wavefront26 ; "wavefront26")]
fn verified_records_cover_uneven_grids(pattern: WalkingPattern) {
    for (width, height) in [(1, 1), (1, 9), (9, 1), (7, 4), (4, 7)] {
        let record = walk_record(pattern, width, height).unwrap();
        assert_permutation(&traverse(&record, width, height), width, height);
    }
}

#[test_case(DependencyPattern::HorizontalWave, WalkingPattern::Horizontal)]
#[test_case(DependencyPattern::VerticalWave, WalkingPattern::Vertical)]
#[test_case(DependencyPattern::Wavefront, WalkingPattern::Wavefront)]
#[test_case(DependencyPattern::Wavefront26, WalkingPattern::Wavefront26)]
fn implied_walk_matches_and_satisfies_the_pattern(dependency: DependencyPattern, walk: WalkingPattern) {
    assert_eq!(implied_walk(dependency), Some(walk));

    let (width, height) = (6, 5);
    let record = walk_record(walk, width, height).unwrap();
    assert_dependency_order(&traverse(&record, width, height), &dependency.vectors(), width, height);
}

#[test]
fn board_ordered_patterns_have_no_implied_walk() {
    assert_eq!(implied_walk(DependencyPattern::Wavefront26Z), None);
    assert_eq!(implied_walk(DependencyPattern::Wavefront26Zi), None);
    assert_eq!(implied_walk(DependencyPattern::None), None);
}

#[test]
fn space_order_prefers_the_explicit_walking_pattern() {
    let mut space = ThreadSpace::create(3, 2).unwrap();
    space.select_walking_pattern(WalkingPattern::Vertical).unwrap();
    let linear: Vec<usize> = order(&space).unwrap().iter().map(|c| c.linear(3)).collect();
    assert_eq!(linear, vec![0, 3, 1, 4, 2, 5]);
}

#[test]
fn space_order_falls_back_to_the_implied_walk() {
    let mut space = ThreadSpace::create(2, 2).unwrap();
    space.select_dependency_pattern(DependencyPattern::VerticalWave).unwrap();
    let linear: Vec<usize> = order(&space).unwrap().iter().map(|c| c.linear(2)).collect();
    assert_eq!(linear, vec![0, 2, 1, 3]);
}
