#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{Layer, LayerId};
use crate::geom::ResizeHandle;
use crate::selection::Selection;
use crate::viewport::{Point, Viewport};

/// Which part of a layer was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub layer_id: LayerId,
    pub part: HitPart,
}

/// Test which layer (if any) is under `canvas_pt`.
///
/// Resize handles of selected layers win over bodies so a handle overlapping a
/// neighbor stays grabbable. Within each pass the topmost layer wins. Handle
/// slop is [`HANDLE_RADIUS_PX`] screen pixels, converted through the zoom.
#[must_use]
pub fn hit_test(canvas_pt: Point, layers: &[Layer], viewport: &Viewport, selection: &Selection) -> Option<Hit> {
    let slop = viewport.screen_dist_to_canvas(HANDLE_RADIUS_PX);

    for layer in layers.iter().rev().filter(|l| selection.contains(&l.id)) {
        let rect = layer.rect();
        for handle in ResizeHandle::ALL {
            let pos = handle.position(&rect);
            if (canvas_pt.x - pos.x).abs() <= slop && (canvas_pt.y - pos.y).abs() <= slop {
                return Some(Hit { layer_id: layer.id, part: HitPart::ResizeHandle(handle) });
            }
        }
    }

    layers
        .iter()
        .rev()
        .find(|l| l.rect().contains(canvas_pt))
        .map(|l| Hit { layer_id: l.id, part: HitPart::Body })
}
