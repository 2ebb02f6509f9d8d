//! Pan/zoom viewport over the infinite canvas.
//!
//! Screen coordinates are CSS pixels relative to the container's top-left
//! corner. The transform is `screen = canvas * zoom + pan`.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_PADDING_PX, MAX_ZOOM, MIN_ZOOM};
use crate::geom::Rect;

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// Width and height of the container in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative (container not laid out yet).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Center of a container of this size, in container coordinates.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width.max(0.0) * 0.5, self.height.max(0.0) * 0.5)
    }
}

/// Clamp a zoom factor to the supported range.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() { zoom.clamp(MIN_ZOOM, MAX_ZOOM) } else { 1.0 }
}

/// Viewport state: pan offset in screen pixels and a zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point (CSS pixels) to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a canvas-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.zoom + self.pan_x,
            y: canvas.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to canvas-space distance.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Set a new zoom while keeping the canvas point under `anchor` fixed on screen.
    ///
    /// `anchor` is in screen space. The zoom is clamped to the supported range
    /// before the pan is recomputed, so the anchor stays exact even at the limits.
    pub fn zoom_at_point(&mut self, new_zoom: f64, anchor: Point) {
        let canvas_anchor = self.screen_to_canvas(anchor);
        self.zoom = clamp_zoom(new_zoom);
        self.pan_x = anchor.x - canvas_anchor.x * self.zoom;
        self.pan_y = anchor.y - canvas_anchor.y * self.zoom;
    }

    /// The canvas-space rectangle currently visible in a container of `size`.
    #[must_use]
    pub fn visible_rect(&self, size: Size) -> Rect {
        let top_left = self.screen_to_canvas(Point::new(0.0, 0.0));
        Rect::new(
            top_left.x,
            top_left.y,
            size.width.max(0.0) / self.zoom,
            size.height.max(0.0) / self.zoom,
        )
    }

    /// Canvas-space point at the center of a container of `size`.
    #[must_use]
    pub fn canvas_center(&self, size: Size) -> Point {
        self.screen_to_canvas(size.center())
    }
}

/// Compute the viewport that frames `content` inside a container of `size`.
///
/// Leaves [`FIT_PADDING_PX`] on every side. With no content or an unmounted
/// container this degrades to the identity viewport rather than failing.
#[must_use]
pub fn fit_to_content(content: Option<Rect>, size: Size) -> Viewport {
    let Some(bounds) = content else {
        return Viewport::default();
    };
    if size.is_empty() {
        return Viewport::default();
    }

    let avail_w = (size.width - FIT_PADDING_PX * 2.0).max(1.0);
    let avail_h = (size.height - FIT_PADDING_PX * 2.0).max(1.0);
    let zoom = if bounds.width > 0.0 && bounds.height > 0.0 {
        clamp_zoom((avail_w / bounds.width).min(avail_h / bounds.height))
    } else {
        1.0
    };

    let center = bounds.center();
    let screen_center = size.center();
    Viewport {
        pan_x: screen_center.x - center.x * zoom,
        pan_y: screen_center.y - center.y * zoom,
        zoom,
    }
}
