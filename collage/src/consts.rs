//! Shared numeric constants for the collage crate.

// ── Layers ──────────────────────────────────────────────────────

/// Smallest width or height a layer may have, in canvas units.
pub const MIN_LAYER_SIZE: f64 = 20.0;

/// Canvas-space offset applied to a layer copied with the duplicate command.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Canvas-space step between consecutive layers of one import batch.
pub const IMPORT_CASCADE_OFFSET: f64 = 20.0;

// ── Viewport ────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.2;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 3.0;

/// Multiplicative step used by the zoom-in / zoom-out commands.
pub const ZOOM_STEP: f64 = 1.2;

/// Wheel delta (pixels) to exponential zoom factor.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.002;

/// Screen-space margin kept around content by fit-to-content, in pixels.
pub const FIT_PADDING_PX: f64 = 50.0;

// ── Gestures ────────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Pointer travel (canvas units at 100% zoom) before a press counts as a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Geometry differences below this are treated as "no change" on commit.
pub const GEOMETRY_EPSILON: f64 = 0.01;
