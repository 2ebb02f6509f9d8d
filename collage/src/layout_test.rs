#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{ImageImport, import_layers};
use crate::settings::GridCount;

fn layer(name: &str, x: f64, y: f64, w: f64, h: f64) -> Layer {
    Layer::new(format!("blob:{name}"), name, Rect::new(x, y, w, h))
}

fn all(layers: &[Layer]) -> HashSet<LayerId> {
    layers.iter().map(|l| l.id).collect()
}

fn selected(layers: &[&Layer]) -> Selection {
    let mut s = Selection::new();
    s.extend(layers.iter().map(|l| l.id));
    s
}

fn spec(rows: u32, cols: u32) -> GridSpec {
    GridSpec { rows, cols, direction: GridDirection::Horizontal, gap: 0, reverse: false }
}

// =============================================================
// Scope
// =============================================================

#[test]
fn scope_all_ignores_selection() {
    let layers = vec![layer("a", 0.0, 0.0, 10.0, 10.0), layer("b", 0.0, 0.0, 10.0, 10.0)];
    assert_eq!(resolve_scope(&layers, &Selection::new(), LayoutScope::All).len(), 2);
}

#[test]
fn scope_selected_only() {
    let layers = vec![layer("a", 0.0, 0.0, 10.0, 10.0), layer("b", 0.0, 0.0, 10.0, 10.0)];
    let scope = resolve_scope(&layers, &selected(&[&layers[1]]), LayoutScope::Selected);
    assert_eq!(scope, HashSet::from([layers[1].id]));
}

// =============================================================
// Stitch
// =============================================================

#[test]
fn stitch_vertical_smart_normalizes_width() {
    let layers = vec![layer("a", 10.0, 20.0, 200.0, 100.0), layer("b", 500.0, 500.0, 100.0, 100.0)];
    let out = stitch(&layers, &all(&layers), StitchDirection::Vertical, 0, true);
    assert_eq!(out[0].rect(), Rect::new(10.0, 20.0, 200.0, 100.0));
    assert_eq!(out[1].rect(), Rect::new(10.0, 120.0, 200.0, 200.0));
}

#[test]
fn stitch_horizontal_with_gap() {
    let layers = vec![layer("a", 0.0, 0.0, 100.0, 50.0), layer("b", 300.0, 300.0, 60.0, 50.0)];
    let out = stitch(&layers, &all(&layers), StitchDirection::Horizontal, 10, false);
    assert_eq!(out[1].rect(), Rect::new(110.0, 0.0, 60.0, 50.0));
}

#[test]
fn stitch_horizontal_smart_normalizes_height() {
    let layers = vec![layer("a", 0.0, 0.0, 100.0, 50.0), layer("b", 300.0, 300.0, 100.0, 100.0)];
    let out = stitch(&layers, &all(&layers), StitchDirection::Horizontal, 0, true);
    assert_eq!(out[0].rect(), Rect::new(0.0, 0.0, 200.0, 100.0));
    assert_eq!(out[1].rect(), Rect::new(200.0, 0.0, 100.0, 100.0));
}

#[test]
fn stitch_is_idempotent() {
    let layers = vec![
        layer("a", 13.0, 7.0, 320.0, 240.0),
        layer("b", 400.0, 90.0, 150.0, 300.0),
        layer("c", -50.0, 600.0, 90.0, 45.0),
    ];
    let scope = all(&layers);
    for direction in [StitchDirection::Vertical, StitchDirection::Horizontal] {
        for smart in [true, false] {
            let once = stitch(&layers, &scope, direction, 6, smart);
            let twice = stitch(&once, &scope, direction, 6, smart);
            assert_eq!(once, twice, "{direction:?} smart={smart}");
        }
    }
}

#[test]
fn stitch_single_layer_is_noop() {
    let layers = vec![layer("a", 5.0, 5.0, 100.0, 100.0), layer("b", 500.0, 5.0, 100.0, 100.0)];
    let scope = HashSet::from([layers[1].id]);
    assert_eq!(stitch(&layers, &scope, StitchDirection::Vertical, 0, true), layers);
}

#[test]
fn stitch_leaves_out_of_scope_untouched() {
    let layers = vec![
        layer("a", 0.0, 0.0, 100.0, 100.0),
        layer("free", 900.0, 900.0, 40.0, 40.0),
        layer("b", 300.0, 0.0, 100.0, 100.0),
    ];
    let scope = HashSet::from([layers[0].id, layers[2].id]);
    let out = stitch(&layers, &scope, StitchDirection::Vertical, 0, false);
    assert_eq!(out[1], layers[1]);
    assert_eq!(out[2].rect(), Rect::new(0.0, 100.0, 100.0, 100.0));
}

#[test]
fn auto_stitch_reads_settings() {
    let layers = vec![layer("a", 0.0, 0.0, 100.0, 50.0), layer("b", 300.0, 300.0, 100.0, 50.0)];
    let settings = AppSettings { stitch_gap: 5, ..AppSettings::default() };
    let out = auto_stitch(&layers, &Selection::new(), &settings, StitchDirection::Vertical);
    assert_eq!(out[1].y, 55.0);
}

// =============================================================
// Grid
// =============================================================

#[test]
fn grid_two_by_two_row_major() {
    let layers: Vec<Layer> = (0..4).map(|i| layer(&format!("l{i}"), 0.0, 0.0, 100.0, 100.0)).collect();
    let out = grid(&layers, &all(&layers), spec(2, 2), Point::new(0.0, 0.0));
    assert_eq!((out[0].x, out[0].y), (-100.0, -100.0));
    assert_eq!((out[1].x, out[1].y), (0.0, -100.0));
    assert_eq!((out[2].x, out[2].y), (-100.0, 0.0));
    assert_eq!((out[3].x, out[3].y), (0.0, 0.0));
}

#[test]
fn grid_column_major() {
    let layers: Vec<Layer> = (0..4).map(|i| layer(&format!("l{i}"), 0.0, 0.0, 100.0, 100.0)).collect();
    let spec = GridSpec { direction: GridDirection::Vertical, ..spec(2, 2) };
    let out = grid(&layers, &all(&layers), spec, Point::new(0.0, 0.0));
    assert_eq!((out[1].x, out[1].y), (-100.0, 0.0));
    assert_eq!((out[2].x, out[2].y), (0.0, -100.0));
}

#[test]
fn grid_reverse_fills_from_last() {
    let layers: Vec<Layer> = (0..2).map(|i| layer(&format!("l{i}"), 0.0, 0.0, 100.0, 100.0)).collect();
    let spec = GridSpec { reverse: true, ..spec(1, 2) };
    let out = grid(&layers, &all(&layers), spec, Point::new(0.0, 0.0));
    assert_eq!(out[1].x, -100.0);
    assert_eq!(out[0].x, 0.0);
}

#[test]
fn grid_capacity_leaves_overflow_untouched() {
    let layers: Vec<Layer> = (0..7).map(|i| layer(&format!("l{i}"), 1000.0, 1000.0, 100.0, 100.0)).collect();
    let out = grid(&layers, &all(&layers), spec(2, 2), Point::new(0.0, 0.0));
    let moved = out.iter().zip(&layers).filter(|(a, b)| a.rect() != b.rect()).count();
    assert_eq!(moved, 4);
    for i in 4..7 {
        assert_eq!(out[i], layers[i]);
    }
}

#[test]
fn grid_fits_and_centers_in_cell() {
    let layers = vec![layer("wide", 0.0, 0.0, 200.0, 100.0), layer("square", 0.0, 0.0, 100.0, 100.0)];
    let out = grid(&layers, &all(&layers), spec(2, 1), Point::new(0.0, 0.0));
    // column width 200, row heights 100/100
    assert_eq!(out[0].rect(), Rect::new(-100.0, -100.0, 200.0, 100.0));
    assert_eq!(out[1].rect(), Rect::new(-50.0, 0.0, 100.0, 100.0));
}

#[test]
fn grid_gap_spaces_cells() {
    let layers: Vec<Layer> = (0..2).map(|i| layer(&format!("l{i}"), 0.0, 0.0, 100.0, 100.0)).collect();
    let spec = GridSpec { gap: 10, ..spec(1, 2) };
    let out = grid(&layers, &all(&layers), spec, Point::new(0.0, 0.0));
    assert_eq!(out[0].x, -105.0);
    assert_eq!(out[1].x, 5.0);
}

#[test]
fn grid_huge_column_count_only_sizes_occupied_cells() {
    let layers: Vec<Layer> = (0..2).map(|i| layer(&format!("l{i}"), 0.0, 0.0, 100.0, 100.0)).collect();
    let out = grid(&layers, &all(&layers), spec(1, 4_000_000_000), Point::new(0.0, 0.0));
    assert_eq!(out[0].rect(), Rect::new(-100.0, -50.0, 100.0, 100.0));
    assert_eq!(out[1].rect(), Rect::new(0.0, -50.0, 100.0, 100.0));
}

#[test]
fn grid_max_counts_do_not_overflow_capacity() {
    let layers: Vec<Layer> = (0..3).map(|i| layer(&format!("l{i}"), 0.0, 0.0, 100.0, 100.0)).collect();
    let out = grid(&layers, &all(&layers), spec(u32::MAX, u32::MAX), Point::new(0.0, 0.0));
    let xs: Vec<f64> = out.iter().map(|l| l.x).collect();
    assert_eq!(xs, vec![-150.0, -50.0, 50.0]);
    assert!(out.iter().all(|l| l.y == -50.0));
}

#[test]
fn grid_empty_rows_still_count_gaps() {
    let layers: Vec<Layer> = (0..2).map(|i| layer(&format!("l{i}"), 0.0, 0.0, 100.0, 100.0)).collect();
    let spec = GridSpec { gap: 10, ..spec(3, 2) };
    let out = grid(&layers, &all(&layers), spec, Point::new(0.0, 0.0));
    // one occupied row of 100 plus two gaps: total height 120
    assert_eq!((out[0].x, out[0].y), (-105.0, -60.0));
    assert_eq!((out[1].x, out[1].y), (5.0, -60.0));
}

#[test]
fn grid_layout_unset_dimension_is_noop() {
    let layers = vec![layer("a", 3.0, 4.0, 100.0, 100.0)];
    let settings = AppSettings { grid_cols: GridCount::Unset, ..AppSettings::default() };
    assert_eq!(grid_layout(&layers, &Selection::new(), &settings, Point::default()), layers);
}

#[test]
fn import_then_grid_places_in_name_order() {
    let images = ["b", "a", "d", "c"]
        .iter()
        .map(|n| ImageImport { src: format!("blob:{n}"), name: (*n).to_owned(), width: 100.0, height: 100.0 })
        .collect();
    let layers = import_layers(images, Point::new(500.0, 500.0));
    let out = grid_layout(&layers, &Selection::new(), &AppSettings::default(), Point::new(0.0, 0.0));

    let at = |name: &str| out.iter().find(|l| l.name == name).map(|l| (l.x, l.y));
    assert_eq!(at("a"), Some((-100.0, -100.0)));
    assert_eq!(at("b"), Some((0.0, -100.0)));
    assert_eq!(at("c"), Some((-100.0, 0.0)));
    assert_eq!(at("d"), Some((0.0, 0.0)));
}

// =============================================================
// Align
// =============================================================

fn frame() -> Rect {
    Rect::new(0.0, 0.0, 1000.0, 800.0)
}

#[test]
fn align_left_moves_group_rigidly() {
    let layers = vec![layer("a", 100.0, 10.0, 50.0, 50.0), layer("b", 300.0, 200.0, 80.0, 40.0)];
    let out = align(&layers, &selected(&[&layers[0], &layers[1]]), Alignment::Left, frame());
    assert_eq!(out[0].x, 0.0);
    assert_eq!(out[1].x, 200.0);
    assert_eq!(out[0].y, 10.0);
    assert_eq!(out[1].y, 200.0);
}

#[test]
fn align_right_uses_far_edge() {
    let layers = vec![layer("a", 100.0, 10.0, 50.0, 50.0), layer("b", 300.0, 200.0, 80.0, 40.0)];
    let out = align(&layers, &selected(&[&layers[0], &layers[1]]), Alignment::Right, frame());
    assert_eq!(out[1].rect().right(), 1000.0);
    assert_eq!(out[1].x - out[0].x, 200.0);
}

#[test]
fn align_center_and_middle() {
    let layers = vec![layer("a", 0.0, 0.0, 100.0, 100.0), layer("b", 200.0, 200.0, 100.0, 100.0)];
    let sel = selected(&[&layers[0], &layers[1]]);
    let h = align(&layers, &sel, Alignment::CenterH, frame());
    assert_eq!(h[0].x, 350.0);
    let v = align(&layers, &sel, Alignment::MiddleV, frame());
    assert_eq!(v[0].y, 250.0);
}

#[test]
fn align_bottom() {
    let layers = vec![layer("a", 0.0, 0.0, 100.0, 100.0), layer("b", 200.0, 200.0, 100.0, 100.0)];
    let out = align(&layers, &selected(&[&layers[0], &layers[1]]), Alignment::Bottom, frame());
    assert_eq!(out[1].rect().bottom(), 800.0);
    assert_eq!(out[0].y, 500.0);
}

#[test]
fn align_needs_two_layers() {
    let layers = vec![layer("a", 100.0, 100.0, 50.0, 50.0), layer("b", 300.0, 300.0, 50.0, 50.0)];
    assert_eq!(align(&layers, &selected(&[&layers[0]]), Alignment::Left, frame()), layers);
}

#[test]
fn align_leaves_unselected_untouched() {
    let layers = vec![
        layer("a", 100.0, 100.0, 50.0, 50.0),
        layer("b", 300.0, 300.0, 50.0, 50.0),
        layer("c", 700.0, 700.0, 50.0, 50.0),
    ];
    let out = align(&layers, &selected(&[&layers[0], &layers[1]]), Alignment::Top, frame());
    assert_eq!(out[2], layers[2]);
    assert_eq!(out[0].y, 0.0);
    assert_eq!(out[1].y, 200.0);
}
