#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point / Size ---

#[test]
fn point_distance() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_midpoint() {
    assert_eq!(Point::new(0.0, 10.0).midpoint(Point::new(20.0, 30.0)), Point::new(10.0, 20.0));
}

#[test]
fn size_empty_when_any_dimension_zero() {
    assert!(Size::new(0.0, 100.0).is_empty());
    assert!(Size::new(100.0, 0.0).is_empty());
    assert!(!Size::new(1.0, 1.0).is_empty());
}

#[test]
fn size_center() {
    assert_eq!(Size::new(800.0, 600.0).center(), Point::new(400.0, 300.0));
}

// --- clamp_zoom ---

#[test]
fn clamp_zoom_limits() {
    assert_eq!(clamp_zoom(0.01), MIN_ZOOM);
    assert_eq!(clamp_zoom(10.0), MAX_ZOOM);
    assert_eq!(clamp_zoom(1.5), 1.5);
}

#[test]
fn clamp_zoom_non_finite_resets() {
    assert_eq!(clamp_zoom(f64::NAN), 1.0);
    assert_eq!(clamp_zoom(f64::INFINITY), 1.0);
}

// --- Conversions ---

#[test]
fn default_viewport_is_identity() {
    let vp = Viewport::default();
    let p = Point::new(12.0, -7.0);
    assert_eq!(vp.screen_to_canvas(p), p);
    assert_eq!(vp.canvas_to_screen(p), p);
}

#[test]
fn screen_to_canvas_applies_pan_and_zoom() {
    let vp = Viewport { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    assert_eq!(vp.screen_to_canvas(Point::new(300.0, 250.0)), Point::new(100.0, 100.0));
}

#[test]
fn canvas_to_screen_inverts_screen_to_canvas() {
    let vp = Viewport { pan_x: -37.5, pan_y: 12.25, zoom: 0.75 };
    let screen = Point::new(411.0, 93.0);
    assert!(point_approx_eq(vp.canvas_to_screen(vp.screen_to_canvas(screen)), screen));
}

#[test]
fn screen_dist_scales_with_zoom() {
    let vp = Viewport { zoom: 2.0, ..Viewport::default() };
    assert_eq!(vp.screen_dist_to_canvas(10.0), 5.0);
}

// --- zoom_at_point ---

#[test]
fn zoom_at_point_keeps_anchor_fixed() {
    let mut vp = Viewport { pan_x: 30.0, pan_y: -20.0, zoom: 1.0 };
    let anchor = Point::new(400.0, 300.0);
    let before = vp.screen_to_canvas(anchor);
    vp.zoom_at_point(2.5, anchor);
    assert_eq!(vp.zoom, 2.5);
    assert!(point_approx_eq(vp.screen_to_canvas(anchor), before));
}

#[test]
fn zoom_at_point_clamps_and_keeps_anchor() {
    let mut vp = Viewport::default();
    let anchor = Point::new(200.0, 100.0);
    let before = vp.screen_to_canvas(anchor);
    vp.zoom_at_point(50.0, anchor);
    assert_eq!(vp.zoom, MAX_ZOOM);
    assert!(point_approx_eq(vp.screen_to_canvas(anchor), before));

    vp.zoom_at_point(0.0, anchor);
    assert_eq!(vp.zoom, MIN_ZOOM);
    assert!(point_approx_eq(vp.screen_to_canvas(anchor), before));
}

// --- visible_rect / canvas_center ---

#[test]
fn visible_rect_at_zoom() {
    let vp = Viewport { pan_x: -100.0, pan_y: -50.0, zoom: 2.0 };
    let r = vp.visible_rect(Size::new(800.0, 600.0));
    assert_eq!(r, Rect::new(50.0, 25.0, 400.0, 300.0));
}

#[test]
fn canvas_center_of_container() {
    let vp = Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 0.5 };
    assert_eq!(vp.canvas_center(Size::new(800.0, 600.0)), Point::new(800.0, 600.0));
}

// --- fit_to_content ---

#[test]
fn fit_with_no_content_is_identity() {
    assert_eq!(fit_to_content(None, Size::new(800.0, 600.0)), Viewport::default());
}

#[test]
fn fit_with_unmounted_container_is_identity() {
    let content = Some(Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(fit_to_content(content, Size::default()), Viewport::default());
}

#[test]
fn fit_centers_and_pads_content() {
    let size = Size::new(800.0, 600.0);
    let content = Rect::new(100.0, 100.0, 350.0, 250.0);
    let vp = fit_to_content(Some(content), size);

    // avail 700x500 -> min(2.0, 2.0)
    assert!(approx_eq(vp.zoom, 2.0));
    let center = vp.canvas_to_screen(content.center());
    assert!(point_approx_eq(center, size.center()));

    let top_left = vp.canvas_to_screen(Point::new(content.x, content.y));
    assert!(top_left.x >= FIT_PADDING_PX - EPSILON);
    assert!(top_left.y >= FIT_PADDING_PX - EPSILON);
}

#[test]
fn fit_clamps_zoom_for_huge_content() {
    let vp = fit_to_content(Some(Rect::new(0.0, 0.0, 100_000.0, 100_000.0)), Size::new(800.0, 600.0));
    assert_eq!(vp.zoom, MIN_ZOOM);
}
