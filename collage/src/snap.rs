//! Snap target search and guide lines.
//!
//! While a layer (or group) is dragged or resized, its edges are pulled onto
//! nearby candidate coordinates: the canvas origin, the canvas bounds when the
//! caller has them, and the near/far edges of every other layer. Each axis is
//! searched independently and yields at most one guide.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::geom::Rect;
use crate::viewport::Size;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// A vertical line at a fixed x.
    Vertical,
    /// A horizontal line at a fixed y.
    Horizontal,
}

/// A transient guide line shown while an edge is snapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub axis: Axis,
    /// Canvas-space x (vertical) or y (horizontal) of the line.
    pub position: f64,
}

/// Outcome of a snap search. Absent deltas mean "no snapping on that axis".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    pub dx: Option<f64>,
    pub dy: Option<f64>,
    pub guides: Vec<SnapGuide>,
}

/// Candidate coordinates on both axes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapTargets {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl SnapTargets {
    /// Collect candidates: origin, optional canvas bounds, then every rect's near/far edges.
    #[must_use]
    pub fn collect<'a, I>(others: I, canvas_bounds: Option<Size>) -> Self
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        let mut xs = vec![0.0];
        let mut ys = vec![0.0];
        if let Some(bounds) = canvas_bounds {
            xs.push(bounds.width);
            ys.push(bounds.height);
        }
        for r in others {
            xs.push(r.x);
            xs.push(r.right());
            ys.push(r.y);
            ys.push(r.bottom());
        }
        Self { xs, ys }
    }
}

/// Nearest snap on one axis for a set of edges: `(delta, target)`.
fn nearest(edges: &[f64], candidates: &[f64], threshold: f64) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64, f64)> = None;
    for &edge in edges {
        for &candidate in candidates {
            let dist = (candidate - edge).abs();
            if dist >= threshold {
                continue;
            }
            if best.is_none_or(|(d, _, _)| dist < d) {
                best = Some((dist, candidate - edge, candidate));
            }
        }
    }
    best.map(|(_, delta, target)| (delta, target))
}

/// Find the offsets that align `active`'s edges to the nearest candidates.
///
/// For each axis the candidates are `{0, canvas bound}` plus the near/far edges
/// of every rect in `others`. Both edges of `active` are compared against every
/// candidate; the single smallest distance strictly below `threshold` wins and
/// produces a signed delta plus one guide at the candidate coordinate. Ties go
/// to the first pair found in scan order, so equal input yields equal output.
#[must_use]
pub fn compute_snap_targets(active: &Rect, others: &[Rect], canvas_bounds: Option<Size>, threshold: f64) -> SnapResult {
    let targets = SnapTargets::collect(others, canvas_bounds);
    snap_rect(active, &targets, threshold)
}

/// [`compute_snap_targets`] against precollected candidates.
#[must_use]
pub fn snap_rect(active: &Rect, targets: &SnapTargets, threshold: f64) -> SnapResult {
    let mut result = SnapResult::default();

    if let Some((dx, x)) = nearest(&[active.x, active.right()], &targets.xs, threshold) {
        result.dx = Some(dx);
        result.guides.push(SnapGuide { axis: Axis::Vertical, position: x });
    }
    if let Some((dy, y)) = nearest(&[active.y, active.bottom()], &targets.ys, threshold) {
        result.dy = Some(dy);
        result.guides.push(SnapGuide { axis: Axis::Horizontal, position: y });
    }

    result
}

/// Single-axis lookup: delta from `value` to the nearest candidate within `threshold`.
#[must_use]
pub fn get_snap_delta(value: f64, candidates: &[f64], threshold: f64) -> Option<f64> {
    nearest(&[value], candidates, threshold).map(|(delta, _)| delta)
}
