//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Modifiers`, `Button`, `Key` and `WheelDelta` describe raw host events.
//! `GestureState` is the one active gesture tracked between pointer-down and
//! pointer-up; each variant carries exactly the context it needs, so states
//! like "resizing while panning" cannot be represented. `UiState` is the
//! persistent, renderer-visible part of the interaction (selection, guides,
//! marquee, mode toggles).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::HashMap;

use crate::doc::LayerId;
use crate::geom::{Rect, ResizeHandle};
use crate::selection::Selection;
use crate::snap::SnapGuide;
use crate::viewport::Point;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"z"`, `"Alt"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive comparison for single-letter shortcuts.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent interaction state visible to the renderer and the host UI.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently selected layers.
    pub selection: Selection,
    /// Guide lines for the active snap, replaced on every move.
    pub guides: Vec<SnapGuide>,
    /// Marquee rectangle in screen space while box-selecting.
    pub marquee: Option<Rect>,
    /// Batch-select mode: clicks add/toggle and empty-canvas drags draw a marquee.
    pub batch_mode: bool,
    /// Marquee subtracts from the selection instead of adding.
    pub deselect_mode: bool,
    /// Alt key currently held (tracked from key events, reset on blur).
    pub alt_held: bool,
}

/// The active gesture.
///
/// Each active variant carries the context needed to compute incremental
/// results from the gesture origin and to commit one history entry on release.
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving one or more layers as a rigid group.
    Dragging {
        /// Canvas-space pointer position at pointer-down.
        start_canvas: Point,
        /// Pre-gesture rect of every dragged layer.
        initial: HashMap<LayerId, Rect>,
        /// Already-selected layer clicked in batch mode; deselected if released without moving.
        pending_toggle: Option<LayerId>,
        /// Pointer travelled past the drag threshold.
        has_moved: bool,
        /// Alt-drag created clones at pointer-down; the gesture always commits.
        duplicated: bool,
        /// Selection before pointer-down, restored if the drag is cancelled.
        prior_selection: Selection,
    },
    /// Resizing one layer by a corner handle.
    Resizing {
        id: LayerId,
        handle: ResizeHandle,
        /// Canvas-space pointer position at pointer-down.
        start_canvas: Point,
        /// Layer rect at pointer-down.
        initial: Rect,
        has_moved: bool,
    },
    /// Panning the viewport.
    Panning {
        /// Screen-space pointer position at pointer-down.
        start_screen: Point,
        /// Pan offset at pointer-down.
        start_pan: Point,
    },
    /// Drawing a marquee; hit-testing happens on release.
    Selecting {
        /// Screen-space corner where the marquee started.
        start_screen: Point,
        /// Screen-space pointer position at the latest move.
        current_screen: Point,
    },
    /// Two-finger pinch zoom.
    Pinching {
        /// Distance between the touches at pinch start.
        start_distance: f64,
        /// Zoom at pinch start.
        start_zoom: f64,
        /// Pan offset at pinch start.
        start_pan: Point,
        /// Touch centroid at pinch start, in container coordinates.
        centroid: Point,
    },
}

impl GestureState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::Resizing { .. } => "resizing",
            Self::Panning { .. } => "panning",
            Self::Selecting { .. } => "selecting",
            Self::Pinching { .. } => "pinching",
        }
    }
}
