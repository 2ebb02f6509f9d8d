//! Rendering: draws the interaction overlay to a 2D context.
//!
//! Layer images themselves are drawn by the host. This module draws what sits
//! on top of them: selection outlines, resize handles, snap guides and the
//! marquee. It reads engine state and never mutates it.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::HANDLE_RADIUS_PX;
use crate::engine::EngineCore;
use crate::geom::{Rect, ResizeHandle};
use crate::snap::{Axis, SnapGuide};

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

const ACCENT: &str = "#1E90FF";
const GUIDE_COLOR: &str = "#FF3B8B";

/// Draw the overlay for the engine's current state.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let size = core.container_size();
    let viewport = core.viewport;
    let dpr = core.dpr;

    // Screen-space setup.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, size.width, size.height);

    // Canvas-space overlay.
    ctx.save();
    ctx.translate(viewport.pan_x, viewport.pan_y)?;
    ctx.scale(viewport.zoom, viewport.zoom)?;

    for layer in core.ui.selection.layers(&core.layers) {
        draw_selection(ctx, &layer.rect(), viewport.zoom)?;
    }

    let visible = viewport.visible_rect(size);
    for guide in &core.ui.guides {
        draw_guide(ctx, guide, &visible, viewport.zoom);
    }
    ctx.restore();

    // Marquee is kept in screen space.
    if let Some(m) = core.ui.marquee {
        draw_marquee(ctx, m, core.ui.deselect_mode)?;
    }

    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, segment: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&segment.into());
    dash_array.push(&segment.into());
    ctx.set_line_dash(&dash_array)
}

fn draw_selection(ctx: &CanvasRenderingContext2d, rect: &Rect, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.0 / zoom);
    set_dash(ctx, SELECTION_DASH_PX / zoom)?;
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.set_line_dash(&js_sys::Array::new())?;

    let size = HANDLE_RADIUS_PX / zoom;
    ctx.set_fill_style_str("#fff");
    for handle in ResizeHandle::ALL {
        let p = handle.position(rect);
        ctx.fill_rect(p.x - size / 2.0, p.y - size / 2.0, size, size);
        ctx.stroke_rect(p.x - size / 2.0, p.y - size / 2.0, size, size);
    }
    ctx.restore();
    Ok(())
}

fn draw_guide(ctx: &CanvasRenderingContext2d, guide: &SnapGuide, visible: &Rect, zoom: f64) {
    ctx.save();
    ctx.set_stroke_style_str(GUIDE_COLOR);
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    match guide.axis {
        Axis::Vertical => {
            ctx.move_to(guide.position, visible.y);
            ctx.line_to(guide.position, visible.bottom());
        }
        Axis::Horizontal => {
            ctx.move_to(visible.x, guide.position);
            ctx.line_to(visible.right(), guide.position);
        }
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: Rect, subtract: bool) -> Result<(), JsValue> {
    ctx.save();
    set_dash(ctx, SELECTION_DASH_PX)?;
    if subtract {
        ctx.set_stroke_style_str("#E5484D");
        ctx.set_fill_style_str("rgba(229, 72, 77, 0.12)");
    } else {
        ctx.set_stroke_style_str(ACCENT);
        ctx.set_fill_style_str("rgba(30, 144, 255, 0.12)");
    }
    ctx.set_line_width(1.0);
    ctx.fill_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.stroke_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}
