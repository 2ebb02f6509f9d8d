//! Layout algorithms over the layer list: auto-stitch, grid packing, group alignment.
//!
//! All three are pure: they read the current list plus a scope and return a new
//! list. Out-of-scope layers come back untouched and every layer keeps its index,
//! so stacking order never changes as a side effect of a layout.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::consts::MIN_LAYER_SIZE;
use crate::doc::{Layer, LayerId};
use crate::geom::{Rect, bounding_box, fit_into};
use crate::selection::Selection;
use crate::settings::{AppSettings, GridDirection, LayoutScope};
use crate::viewport::Point;

/// Axis along which auto-stitch concatenates layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StitchDirection {
    /// Stack top-to-bottom.
    Vertical,
    /// Stack left-to-right.
    Horizontal,
}

/// Group alignment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    CenterH,
    Right,
    Top,
    MiddleV,
    Bottom,
}

/// Parameters of one grid layout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    pub direction: GridDirection,
    pub gap: u32,
    pub reverse: bool,
}

impl GridSpec {
    /// Grid parameters from settings; `None` while rows or cols is unset.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Option<Self> {
        let (rows, cols) = settings.grid_dims()?;
        Some(Self {
            rows,
            cols,
            direction: settings.grid_direction,
            gap: settings.grid_gap,
            reverse: settings.grid_reverse,
        })
    }
}

/// Ids a layout acts on: the selection or every layer.
#[must_use]
pub fn resolve_scope(layers: &[Layer], selection: &Selection, scope: LayoutScope) -> HashSet<LayerId> {
    match scope {
        LayoutScope::All => layers.iter().map(|l| l.id).collect(),
        LayoutScope::Selected => layers
            .iter()
            .filter(|l| selection.contains(&l.id))
            .map(|l| l.id)
            .collect(),
    }
}

/// Write new rects back into a copy of the full list, by id.
fn merge(layers: &[Layer], placed: &HashMap<LayerId, Rect>) -> Vec<Layer> {
    layers
        .iter()
        .map(|l| {
            let mut out = l.clone();
            if let Some(rect) = placed.get(&l.id) {
                out.set_rect(*rect);
            }
            out
        })
        .collect()
}

fn in_scope<'a>(layers: &'a [Layer], scope: &HashSet<LayerId>) -> Vec<&'a Layer> {
    layers.iter().filter(|l| scope.contains(&l.id)).collect()
}

// =============================================================
// Auto-stitch
// =============================================================

/// Concatenate the scoped layers along `direction` in their current list order.
///
/// The first layer's cross-axis coordinate becomes the shared alignment line.
/// With `smart` every layer is scaled (aspect preserved) to the widest width of
/// the scope for vertical stitches, or the tallest height for horizontal ones.
/// `gap` canvas units separate neighbors. Fewer than two layers is a no-op.
#[must_use]
pub fn stitch(
    layers: &[Layer],
    scope: &HashSet<LayerId>,
    direction: StitchDirection,
    gap: u32,
    smart: bool,
) -> Vec<Layer> {
    let scoped = in_scope(layers, scope);
    let Some(first) = scoped.first() else {
        return layers.to_vec();
    };
    if scoped.len() < 2 {
        return layers.to_vec();
    }

    let gap = f64::from(gap);
    let max_width = scoped.iter().map(|l| l.width).fold(MIN_LAYER_SIZE, f64::max);
    let max_height = scoped.iter().map(|l| l.height).fold(MIN_LAYER_SIZE, f64::max);

    let mut placed = HashMap::with_capacity(scoped.len());
    match direction {
        StitchDirection::Vertical => {
            let x = first.x;
            let mut cursor = first.y;
            for layer in &scoped {
                let (w, h) = if smart {
                    (max_width, layer.height * max_width / layer.width)
                } else {
                    (layer.width, layer.height)
                };
                let h = h.max(MIN_LAYER_SIZE);
                placed.insert(layer.id, Rect::new(x, cursor, w, h));
                cursor += h + gap;
            }
        }
        StitchDirection::Horizontal => {
            let y = first.y;
            let mut cursor = first.x;
            for layer in &scoped {
                let (w, h) = if smart {
                    (layer.width * max_height / layer.height, max_height)
                } else {
                    (layer.width, layer.height)
                };
                let w = w.max(MIN_LAYER_SIZE);
                placed.insert(layer.id, Rect::new(cursor, y, w, h));
                cursor += w + gap;
            }
        }
    }

    merge(layers, &placed)
}

/// [`stitch`] with scope, gap and smart mode read from settings.
#[must_use]
pub fn auto_stitch(
    layers: &[Layer],
    selection: &Selection,
    settings: &AppSettings,
    direction: StitchDirection,
) -> Vec<Layer> {
    let scope = resolve_scope(layers, selection, settings.stitch_scope);
    stitch(layers, &scope, direction, settings.stitch_gap, settings.smart_stitch)
}

// =============================================================
// Grid
// =============================================================

/// Pack the scoped layers into a ragged `rows x cols` grid centered on `center`.
///
/// Each column is as wide as its widest layer and each row as tall as its
/// tallest. Layers are fit into their cell preserving aspect ratio and
/// centered. Layers past `rows * cols` are left untouched.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn grid(layers: &[Layer], scope: &HashSet<LayerId>, spec: GridSpec, center: Point) -> Vec<Layer> {
    let rows = spec.rows as usize;
    let cols = spec.cols as usize;
    if rows == 0 || cols == 0 {
        return layers.to_vec();
    }

    let mut ordered = in_scope(layers, scope);
    if spec.reverse {
        ordered.reverse();
    }
    ordered.truncate(rows.saturating_mul(cols));
    if ordered.is_empty() {
        return layers.to_vec();
    }

    let cell_of = |i: usize| -> (usize, usize) {
        match spec.direction {
            GridDirection::Horizontal => (i / cols, i % cols),
            GridDirection::Vertical => (i % rows, i / rows),
        }
    };

    // Occupied cells never index past the layer count, so only that many
    // tracks are stored; empty tracks still count toward the gaps below.
    let mut col_widths = vec![0.0_f64; cols.min(ordered.len())];
    let mut row_heights = vec![0.0_f64; rows.min(ordered.len())];
    for (i, layer) in ordered.iter().enumerate() {
        let (r, c) = cell_of(i);
        col_widths[c] = col_widths[c].max(layer.width);
        row_heights[r] = row_heights[r].max(layer.height);
    }

    let gap = f64::from(spec.gap);
    let total_w: f64 = col_widths.iter().sum::<f64>() + f64::from(spec.cols - 1) * gap;
    let total_h: f64 = row_heights.iter().sum::<f64>() + f64::from(spec.rows - 1) * gap;
    let origin_x = center.x - total_w / 2.0;
    let origin_y = center.y - total_h / 2.0;

    let offsets = |sizes: &[f64], origin: f64| -> Vec<f64> {
        let mut acc = origin;
        sizes
            .iter()
            .map(|s| {
                let start = acc;
                acc += s + gap;
                start
            })
            .collect()
    };
    let col_x = offsets(&col_widths, origin_x);
    let row_y = offsets(&row_heights, origin_y);

    let mut placed = HashMap::with_capacity(ordered.len());
    for (i, layer) in ordered.iter().enumerate() {
        let (r, c) = cell_of(i);
        let (cell_w, cell_h) = (col_widths[c], row_heights[r]);
        let (w, h) = fit_into(layer.width, layer.height, cell_w, cell_h);
        let x = col_x[c] + (cell_w - w) / 2.0;
        let y = row_y[r] + (cell_h - h) / 2.0;
        placed.insert(layer.id, Rect::new(x, y, w, h));
    }

    merge(layers, &placed)
}

/// [`grid`] with scope and grid parameters read from settings.
///
/// An unset row or column count means "no layout yet" and returns the list unchanged.
#[must_use]
pub fn grid_layout(layers: &[Layer], selection: &Selection, settings: &AppSettings, center: Point) -> Vec<Layer> {
    let Some(spec) = GridSpec::from_settings(settings) else {
        return layers.to_vec();
    };
    let scope = resolve_scope(layers, selection, settings.stitch_scope);
    grid(layers, &scope, spec, center)
}

// =============================================================
// Alignment
// =============================================================

/// Translate the selected group as one rigid body so its bounding box aligns with `frame`.
///
/// `left`/`top` put the group's near edge on the frame's near edge (the
/// canvas origin for the engine's page frame). `right`/`bottom` put its far
/// edge on the frame's far edge and the center variants center it. Every
/// selected layer gets the same offset, so relative positions inside the group
/// never change. Needs at least two selected layers.
#[must_use]
pub fn align(layers: &[Layer], selection: &Selection, alignment: Alignment, frame: Rect) -> Vec<Layer> {
    let selected = selection.layers(layers);
    if selected.len() < 2 {
        return layers.to_vec();
    }
    let Some(group) = bounding_box(selected.iter().map(|l| l.rect())) else {
        return layers.to_vec();
    };

    let (dx, dy) = match alignment {
        Alignment::Left => (frame.x - group.x, 0.0),
        Alignment::CenterH => (frame.center().x - group.center().x, 0.0),
        Alignment::Right => (frame.right() - group.right(), 0.0),
        Alignment::Top => (0.0, frame.y - group.y),
        Alignment::MiddleV => (0.0, frame.center().y - group.center().y),
        Alignment::Bottom => (0.0, frame.bottom() - group.bottom()),
    };

    let placed: HashMap<LayerId, Rect> = selected.iter().map(|l| (l.id, l.rect().translated(dx, dy))).collect();
    merge(layers, &placed)
}
