//! Axis-aligned rectangle math: bounding boxes, overlap, and handle resizing.
//!
//! Everything here is a pure function over plain values. Degenerate input is
//! clamped (never rejected) so callers in the gesture path never have to handle
//! an error.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_LAYER_SIZE;
use crate::viewport::Point;

/// An axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a normalized rectangle spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Same rectangle shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Whether `pt` lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// Whether the two rectangles overlap. Partial overlap counts; touching edges count.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right() && other.x <= self.right() && self.y <= other.bottom() && other.y <= self.bottom()
    }

    /// Width / height, or 1.0 for a degenerate rectangle.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.width > 0.0 && self.height > 0.0 { self.width / self.height } else { 1.0 }
    }

    /// Whether any coordinate differs from `other` by more than `epsilon`.
    #[must_use]
    pub fn differs_from(&self, other: &Rect, epsilon: f64) -> bool {
        (self.x - other.x).abs() > epsilon
            || (self.y - other.y).abs() > epsilon
            || (self.width - other.width).abs() > epsilon
            || (self.height - other.height).abs() > epsilon
    }
}

/// Tight bounding box of a set of rectangles; `None` when the set is empty.
#[must_use]
pub fn bounding_box<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    let mut iter = rects.into_iter();
    let first = iter.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.right(), first.bottom());
    for r in iter {
        min_x = min_x.min(r.x);
        min_y = min_y.min(r.y);
        max_x = max_x.max(r.right());
        max_y = max_y.max(r.bottom());
    }
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// Corner resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// Handle moves the top edge.
    #[must_use]
    pub fn is_north(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }

    /// Handle moves the left edge.
    #[must_use]
    pub fn is_west(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// Position of this handle on `rect`.
    #[must_use]
    pub fn position(self, rect: &Rect) -> Point {
        let x = if self.is_west() { rect.x } else { rect.right() };
        let y = if self.is_north() { rect.y } else { rect.bottom() };
        Point::new(x, y)
    }

    /// CSS cursor shown while this handle is dragged.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }
}

/// Resize `initial` by dragging `handle` by `(dx, dy)` canvas units.
///
/// East/west handles change the width (west also moves `x` so the right edge
/// stays put); north/south change the height (north also moves `y`). With
/// `keep_aspect_ratio` the height follows the new width at the original ratio.
/// Width and height are finally floored to [`MIN_LAYER_SIZE`]; at extreme
/// shrink the floor wins over the aspect ratio. The edge opposite the handle
/// stays fixed even when the floor engages.
#[must_use]
pub fn resize_rect(initial: &Rect, handle: ResizeHandle, dx: f64, dy: f64, keep_aspect_ratio: bool) -> Rect {
    let mut width = if handle.is_west() { initial.width - dx } else { initial.width + dx };
    let mut height = if handle.is_north() { initial.height - dy } else { initial.height + dy };

    if keep_aspect_ratio {
        height = width / initial.aspect_ratio();
    }

    width = width.max(MIN_LAYER_SIZE);
    height = height.max(MIN_LAYER_SIZE);

    anchor_opposite(initial, handle, width, height)
}

/// Place a `width` x `height` rectangle so the edges opposite `handle` match `initial`.
#[must_use]
pub fn anchor_opposite(initial: &Rect, handle: ResizeHandle, width: f64, height: f64) -> Rect {
    let x = if handle.is_west() { initial.right() - width } else { initial.x };
    let y = if handle.is_north() { initial.bottom() - height } else { initial.y };
    Rect::new(x, y, width, height)
}

/// Scale `(width, height)` to fit a `cell_w` x `cell_h` cell preserving aspect ratio.
///
/// Scales to the cell width first; if that overflows the cell height, scales to
/// the height instead.
#[must_use]
pub fn fit_into(width: f64, height: f64, cell_w: f64, cell_h: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (cell_w.max(MIN_LAYER_SIZE), cell_h.max(MIN_LAYER_SIZE));
    }
    let mut scale = cell_w / width;
    if height * scale > cell_h {
        scale = cell_h / height;
    }
    ((width * scale).max(MIN_LAYER_SIZE), (height * scale).max(MIN_LAYER_SIZE))
}
