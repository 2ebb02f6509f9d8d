#![allow(clippy::float_cmp)]

use super::*;

fn r(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, w, h)
}

// --- SnapTargets ---

#[test]
fn targets_start_with_origin() {
    let t = SnapTargets::collect(&Vec::<Rect>::new(), None);
    assert_eq!(t.xs, vec![0.0]);
    assert_eq!(t.ys, vec![0.0]);
}

#[test]
fn targets_include_bounds_and_edges() {
    let t = SnapTargets::collect(&[r(10.0, 20.0, 30.0, 40.0)], Some(Size::new(800.0, 600.0)));
    assert_eq!(t.xs, vec![0.0, 800.0, 10.0, 40.0]);
    assert_eq!(t.ys, vec![0.0, 600.0, 20.0, 60.0]);
}

// --- compute_snap_targets ---

#[test]
fn snaps_left_edge_to_neighbor_right_edge() {
    let active = r(205.0, 500.0, 50.0, 50.0);
    let others = [r(100.0, 300.0, 100.0, 100.0)];
    let result = compute_snap_targets(&active, &others, None, 10.0);
    assert_eq!(result.dx, Some(-5.0));
    assert_eq!(result.dy, None);
    assert_eq!(result.guides, vec![SnapGuide { axis: Axis::Vertical, position: 200.0 }]);
}

#[test]
fn snaps_far_edge() {
    let active = r(500.0, 92.0, 50.0, 50.0);
    let others = [r(0.0, 150.0, 10.0, 10.0)];
    let result = compute_snap_targets(&active, &others, None, 10.0);
    // bottom 142 -> 150
    assert_eq!(result.dy, Some(8.0));
    assert_eq!(result.guides, vec![SnapGuide { axis: Axis::Horizontal, position: 150.0 }]);
}

#[test]
fn threshold_is_strict() {
    let active = r(110.0, 500.0, 50.0, 50.0);
    let others = [r(0.0, 300.0, 100.0, 10.0)];
    let result = compute_snap_targets(&active, &others, None, 10.0);
    assert_eq!(result.dx, None);
    assert!(result.guides.is_empty());
}

#[test]
fn snaps_to_origin() {
    let result = compute_snap_targets(&r(3.0, -4.0, 50.0, 50.0), &[], None, 10.0);
    assert_eq!(result.dx, Some(-3.0));
    assert_eq!(result.dy, Some(4.0));
    assert_eq!(result.guides.len(), 2);
}

#[test]
fn snaps_to_canvas_bounds() {
    let result = compute_snap_targets(&r(745.0, 300.0, 50.0, 50.0), &[], Some(Size::new(800.0, 600.0)), 10.0);
    assert_eq!(result.dx, Some(5.0));
}

#[test]
fn nearest_candidate_wins() {
    let active = r(100.0, 500.0, 50.0, 50.0);
    let others = [r(94.0, 300.0, 1.0, 1.0), r(98.0, 300.0, 1.0, 1.0)];
    // candidates 94,95,98,99 -> 99 is closest to 100
    let result = compute_snap_targets(&active, &others, None, 10.0);
    assert_eq!(result.dx, Some(-1.0));
}

#[test]
fn ties_resolve_to_first_found() {
    // left edge 100 is 4 from 96 and 4 from 104
    let active = r(100.0, 500.0, 20.0, 20.0);
    let others = [r(96.0, 300.0, 0.0, 1.0), r(104.0, 300.0, 0.0, 1.0)];
    let result = compute_snap_targets(&active, &others, None, 10.0);
    assert_eq!(result.dx, Some(-4.0));
}

#[test]
fn deterministic_for_equal_input() {
    let active = r(203.0, 97.0, 60.0, 40.0);
    let others = [r(100.0, 100.0, 100.0, 100.0), r(260.0, 0.0, 40.0, 95.0)];
    let first = compute_snap_targets(&active, &others, None, 10.0);
    for _ in 0..10 {
        assert_eq!(compute_snap_targets(&active, &others, None, 10.0), first);
    }
}

#[test]
fn snap_rect_matches_compute() {
    let active = r(203.0, 97.0, 60.0, 40.0);
    let others = [r(100.0, 100.0, 100.0, 100.0)];
    let targets = SnapTargets::collect(&others, None);
    assert_eq!(snap_rect(&active, &targets, 10.0), compute_snap_targets(&active, &others, None, 10.0));
}

// --- get_snap_delta ---

#[test]
fn snap_delta_within_threshold() {
    assert_eq!(get_snap_delta(98.0, &[0.0, 100.0], 5.0), Some(2.0));
}

#[test]
fn snap_delta_outside_threshold() {
    assert_eq!(get_snap_delta(90.0, &[0.0, 100.0], 5.0), None);
}

#[test]
fn snap_delta_no_candidates() {
    assert_eq!(get_snap_delta(90.0, &[], 5.0), None);
}
