use std::collections::HashSet;

use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{
    DRAG_THRESHOLD, DUPLICATE_OFFSET, GEOMETRY_EPSILON, MIN_LAYER_SIZE, WHEEL_ZOOM_SENSITIVITY, ZOOM_STEP,
};
use crate::doc::{CollageDocument, ExportScope, ImageImport, Layer, LayerId, export_bounds, export_scale, import_layers};
use crate::geom::{Rect, ResizeHandle, anchor_opposite, bounding_box, resize_rect};
use crate::history::History;
use crate::hit::{HitPart, hit_test};
use crate::input::{Button, GestureState, Key, Modifiers, UiState, WheelDelta};
use crate::layout::{self, Alignment, StitchDirection};
use crate::ops;
use crate::render;
use crate::settings::{AppSettings, SettingUpdate};
use crate::snap::{Axis, SnapGuide, SnapTargets, compute_snap_targets, get_snap_delta};
use crate::viewport::{self, Point, Size, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The overlay and layer images need redrawing.
    RenderNeeded,
    /// Layer geometry, order or membership changed.
    LayersChanged,
    /// The selected id set changed.
    SelectionChanged,
    /// Pan or zoom changed.
    ViewportChanged,
    /// A history entry was pushed; `index` is the new cursor.
    HistoryCommitted { index: usize },
    /// Set the container's CSS cursor.
    SetCursor(String),
    /// Capture the pointer for the gesture that just started.
    CapturePointer,
    /// Release any captured pointer.
    ReleasePointer,
}

/// Toolbar/keyboard command failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("a pointer gesture is in progress")]
    GestureInProgress,
    #[error("layer not found: {0}")]
    LayerNotFound(LayerId),
}

/// Position and size of the canvas container in page (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerGeometry {
    pub origin: Point,
    pub size: Size,
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub layers: Vec<Layer>,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: GestureState,
    pub history: History,
    pub settings: AppSettings,
    /// `None` until the host reports container geometry.
    pub container: Option<ContainerGeometry>,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            viewport: Viewport::default(),
            ui: UiState::default(),
            input: GestureState::default(),
            history: History::default(),
            settings: AppSettings::default(),
            container: None,
            dpr: 1.0,
        }
    }
}

fn rejected(result: Result<Vec<Action>, EngineError>) -> Vec<Action> {
    match result {
        Ok(actions) => actions,
        Err(e) => {
            warn!(error = %e, "command rejected");
            Vec::new()
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the document with a loaded one and restart history from it.
    pub fn load_document(&mut self, doc: CollageDocument) {
        info!(layers = doc.layers.len(), "loaded document");
        self.layers = doc.layers;
        self.settings = doc.settings;
        self.history.reset(self.layers.clone());
        self.ui.selection.prune(&self.layers);
        self.input = GestureState::Idle;
        self.ui.guides.clear();
        self.ui.marquee = None;
    }

    /// The current document in its persisted form.
    #[must_use]
    pub fn to_document(&self) -> CollageDocument {
        CollageDocument { layers: self.layers.clone(), settings: self.settings.clone(), ..Default::default() }
    }

    /// Update container geometry (page origin and CSS size).
    pub fn set_container(&mut self, origin: Point, size: Size) {
        self.container = Some(ContainerGeometry { origin, size });
    }

    /// Apply a settings change, deriving grid dimensions when auto-calc is on.
    pub fn update_setting(&mut self, update: SettingUpdate) {
        let scoped = layout::resolve_scope(&self.layers, &self.ui.selection, self.settings.stitch_scope).len();
        self.settings = self.settings.with_setting_derived(update, scoped);
    }

    pub fn set_batch_mode(&mut self, on: bool) {
        self.ui.batch_mode = on;
    }

    pub fn set_deselect_mode(&mut self, on: bool) {
        self.ui.deselect_mode = on;
    }

    // --- Queries ---

    #[must_use]
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == *id)
    }

    /// Ids of the selected layers.
    #[must_use]
    pub fn selected_ids(&self) -> &HashSet<LayerId> {
        self.ui.selection.ids()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn guides(&self) -> &[SnapGuide] {
        &self.ui.guides
    }

    #[must_use]
    pub fn is_gesture_active(&self) -> bool {
        !self.input.is_idle()
    }

    /// Container origin in page coordinates, or zero when unknown.
    #[must_use]
    pub fn container_origin(&self) -> Point {
        self.container.map(|c| c.origin).unwrap_or_default()
    }

    /// Container size, or zero when unknown.
    #[must_use]
    pub fn container_size(&self) -> Size {
        self.container.map(|c| c.size).unwrap_or_default()
    }

    /// Convert a page (client) point to container-local screen coordinates.
    #[must_use]
    pub fn client_to_screen(&self, client: Point) -> Point {
        let origin = self.container_origin();
        Point::new(client.x - origin.x, client.y - origin.y)
    }

    /// Convert a page (client) point to canvas coordinates.
    #[must_use]
    pub fn client_to_canvas(&self, client: Point) -> Point {
        self.viewport.screen_to_canvas(self.client_to_screen(client))
    }

    /// Tight bounds of the layers an export would cover.
    #[must_use]
    pub fn export_bounds(&self, scope: ExportScope) -> Option<Rect> {
        export_bounds(&self.layers, scope)
    }

    /// Pixel scale that keeps in-scope layers at source resolution.
    #[must_use]
    pub fn export_scale(&self, scope: ExportScope) -> f64 {
        export_scale(&self.layers, scope)
    }

    // --- History plumbing ---

    fn commit(&mut self) -> Action {
        self.history.push(self.layers.clone());
        let index = self.history.index();
        info!(index, layers = self.layers.len(), "history committed");
        Action::HistoryCommitted { index }
    }

    /// Replace the layer list, prune selection, and commit if anything changed.
    fn replace_layers(&mut self, next: Vec<Layer>) -> Vec<Action> {
        if next == self.layers {
            return Vec::new();
        }
        self.layers = next;
        let mut actions = vec![Action::LayersChanged];
        if self.ui.selection.prune(&self.layers) > 0 {
            actions.push(Action::SelectionChanged);
        }
        actions.push(self.commit());
        actions.push(Action::RenderNeeded);
        actions
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.input.is_idle() { Ok(()) } else { Err(EngineError::GestureInProgress) }
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.input.is_idle() {
            warn!(gesture = self.input.name(), "pointer-down during active gesture; cancelling it");
            actions.extend(self.cancel_gesture());
        }

        let screen = self.client_to_screen(client);
        let canvas = self.viewport.screen_to_canvas(screen);

        match button {
            Button::Middle => {
                self.start_pan(screen, &mut actions);
            }
            Button::Primary => match hit_test(canvas, &self.layers, &self.viewport, &self.ui.selection) {
                Some(hit) => match hit.part {
                    HitPart::ResizeHandle(handle) => {
                        self.start_resize(hit.layer_id, handle, canvas, &mut actions);
                    }
                    HitPart::Body => {
                        self.start_drag(hit.layer_id, canvas, modifiers, &mut actions);
                    }
                },
                None if self.ui.batch_mode => {
                    self.input = GestureState::Selecting { start_screen: screen, current_screen: screen };
                    self.ui.marquee = Some(Rect::from_corners(screen, screen));
                    actions.push(Action::CapturePointer);
                    actions.push(Action::SetCursor("crosshair".into()));
                }
                None => {
                    if !modifiers.shift && !self.ui.selection.is_empty() {
                        self.ui.selection.clear();
                        actions.push(Action::SelectionChanged);
                    }
                    self.start_pan(screen, &mut actions);
                }
            },
            Button::Secondary => return actions,
        }

        debug!(gesture = self.input.name(), "gesture started");
        actions.push(Action::RenderNeeded);
        actions
    }

    fn start_pan(&mut self, screen: Point, actions: &mut Vec<Action>) {
        self.input = GestureState::Panning {
            start_screen: screen,
            start_pan: Point::new(self.viewport.pan_x, self.viewport.pan_y),
        };
        actions.push(Action::CapturePointer);
        actions.push(Action::SetCursor("grabbing".into()));
    }

    fn start_resize(&mut self, id: LayerId, handle: ResizeHandle, canvas: Point, actions: &mut Vec<Action>) {
        let Some(initial) = self.layer(&id).map(Layer::rect) else {
            return;
        };
        if self.ui.selection.len() != 1 || !self.ui.selection.contains(&id) {
            self.ui.selection.select_only(id);
            actions.push(Action::SelectionChanged);
        }
        self.input = GestureState::Resizing { id, handle, start_canvas: canvas, initial, has_moved: false };
        actions.push(Action::CapturePointer);
        actions.push(Action::SetCursor(handle.cursor().into()));
    }

    fn start_drag(&mut self, id: LayerId, canvas: Point, modifiers: Modifiers, actions: &mut Vec<Action>) {
        let prior_selection = self.ui.selection.clone();
        let already_selected = self.ui.selection.contains(&id);
        let mut pending_toggle = None;

        if modifiers.shift || self.ui.batch_mode {
            if already_selected {
                pending_toggle = Some(id);
            } else {
                self.ui.selection.insert(id);
                actions.push(Action::SelectionChanged);
            }
        } else if !already_selected {
            self.ui.selection.select_only(id);
            actions.push(Action::SelectionChanged);
        }

        let mut duplicated = false;
        if modifiers.alt || self.ui.alt_held {
            let (layers, clone_ids) = ops::duplicate_many(&self.layers, self.ui.selection.ids(), 0.0);
            debug!(count = clone_ids.len(), "alt-drag duplicated selection");
            self.layers = layers;
            self.ui.selection.replace(clone_ids);
            pending_toggle = None;
            duplicated = true;
            actions.push(Action::LayersChanged);
            actions.push(Action::SelectionChanged);
        }

        let initial = self
            .layers
            .iter()
            .filter(|l| self.ui.selection.contains(&l.id))
            .map(|l| (l.id, l.rect()))
            .collect();

        self.input = GestureState::Dragging {
            start_canvas: canvas,
            initial,
            pending_toggle,
            has_moved: false,
            duplicated,
            prior_selection,
        };
        actions.push(Action::CapturePointer);
        actions.push(Action::SetCursor("grabbing".into()));
    }

    pub fn on_pointer_move(&mut self, client: Point, _modifiers: Modifiers) -> Vec<Action> {
        let screen = self.client_to_screen(client);
        let canvas = self.viewport.screen_to_canvas(screen);
        let mut input = std::mem::take(&mut self.input);

        let actions = match &mut input {
            GestureState::Idle | GestureState::Pinching { .. } => Vec::new(),
            GestureState::Dragging { start_canvas, initial, has_moved, .. } => {
                let dx = canvas.x - start_canvas.x;
                let dy = canvas.y - start_canvas.y;
                if !*has_moved && dx.hypot(dy) > self.viewport.screen_dist_to_canvas(DRAG_THRESHOLD) {
                    *has_moved = true;
                }
                if *has_moved {
                    self.drag_to(initial, dx, dy);
                    vec![Action::LayersChanged, Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            GestureState::Resizing { id, handle, start_canvas, initial, has_moved } => {
                let dx = canvas.x - start_canvas.x;
                let dy = canvas.y - start_canvas.y;
                if !*has_moved && dx.hypot(dy) > self.viewport.screen_dist_to_canvas(DRAG_THRESHOLD) {
                    *has_moved = true;
                }
                if *has_moved {
                    self.resize_to(*id, *handle, initial, dx, dy);
                    vec![Action::LayersChanged, Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            GestureState::Panning { start_screen, start_pan } => {
                self.viewport.pan_x = start_pan.x + (screen.x - start_screen.x);
                self.viewport.pan_y = start_pan.y + (screen.y - start_screen.y);
                vec![Action::ViewportChanged, Action::RenderNeeded]
            }
            GestureState::Selecting { start_screen, current_screen } => {
                *current_screen = screen;
                self.ui.marquee = Some(Rect::from_corners(*start_screen, screen));
                vec![Action::RenderNeeded]
            }
        };

        self.input = input;
        actions
    }

    /// Snap threshold in canvas units at the current zoom.
    fn snap_threshold(&self) -> f64 {
        self.viewport.screen_dist_to_canvas(self.settings.snap_threshold)
    }

    /// Move every dragged layer by the same (snapped) offset.
    fn drag_to(&mut self, initial: &std::collections::HashMap<LayerId, Rect>, dx: f64, dy: f64) {
        let (mut dx, mut dy) = (dx, dy);
        self.ui.guides.clear();

        if self.settings.snap_to_grid {
            if let Some(group) = bounding_box(initial.values().copied()) {
                let others: Vec<Rect> = self
                    .layers
                    .iter()
                    .filter(|l| !initial.contains_key(&l.id))
                    .map(Layer::rect)
                    .collect();
                let snap = compute_snap_targets(&group.translated(dx, dy), &others, None, self.snap_threshold());
                dx += snap.dx.unwrap_or(0.0);
                dy += snap.dy.unwrap_or(0.0);
                self.ui.guides = snap.guides;
            }
        }

        for layer in &mut self.layers {
            if let Some(start) = initial.get(&layer.id) {
                layer.x = start.x + dx;
                layer.y = start.y + dy;
            }
        }
    }

    /// Resize one layer from its initial rect, snapping the handle's active edges.
    ///
    /// A snap that would take the layer under [`MIN_LAYER_SIZE`] is skipped, so
    /// the floor never moves the edge opposite the handle.
    fn resize_to(&mut self, id: LayerId, handle: ResizeHandle, initial: &Rect, dx: f64, dy: f64) {
        let keep = self.settings.keep_aspect_ratio;
        let mut rect = resize_rect(initial, handle, dx, dy, keep);
        self.ui.guides.clear();

        if self.settings.snap_to_grid {
            let others: Vec<Rect> = self.layers.iter().filter(|l| l.id != id).map(Layer::rect).collect();
            let targets = SnapTargets::collect(&others, None);
            let threshold = self.snap_threshold();
            let mut width = rect.width;
            let mut height = rect.height;

            let x_edge = if handle.is_west() { rect.x } else { rect.right() };
            if let Some(delta) = get_snap_delta(x_edge, &targets.xs, threshold) {
                let snapped = if handle.is_west() { width - delta } else { width + delta };
                if snapped >= MIN_LAYER_SIZE {
                    width = snapped;
                    self.ui.guides.push(SnapGuide { axis: Axis::Vertical, position: x_edge + delta });
                    if keep {
                        height = (width / initial.aspect_ratio()).max(MIN_LAYER_SIZE);
                    }
                }
            }

            if !keep {
                let y_edge = if handle.is_north() { rect.y } else { rect.bottom() };
                if let Some(delta) = get_snap_delta(y_edge, &targets.ys, threshold) {
                    let snapped = if handle.is_north() { height - delta } else { height + delta };
                    if snapped >= MIN_LAYER_SIZE {
                        height = snapped;
                        self.ui.guides.push(SnapGuide { axis: Axis::Horizontal, position: y_edge + delta });
                    }
                }
            }

            rect = anchor_opposite(initial, handle, width, height);
        }

        if let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) {
            layer.set_rect(rect);
        }
    }

    pub fn on_pointer_up(&mut self, client: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let input = std::mem::take(&mut self.input);
        if input.is_idle() {
            return Vec::new();
        }
        let mut actions = Vec::new();

        match input {
            GestureState::Idle | GestureState::Pinching { .. } | GestureState::Panning { .. } => {}
            GestureState::Selecting { start_screen, .. } => {
                let end = self.client_to_screen(client);
                self.resolve_marquee(Rect::from_corners(start_screen, end));
                actions.push(Action::SelectionChanged);
            }
            GestureState::Dragging { initial, pending_toggle, has_moved, duplicated, .. } => {
                if let Some(id) = pending_toggle {
                    if !has_moved && self.ui.selection.remove(&id) {
                        actions.push(Action::SelectionChanged);
                    }
                }
                if duplicated || self.moved_from(initial.iter().map(|(id, r)| (*id, *r))) {
                    actions.push(self.commit());
                }
            }
            GestureState::Resizing { id, initial, .. } => {
                if self.moved_from(std::iter::once((id, initial))) {
                    actions.push(self.commit());
                }
            }
        }

        debug!("gesture ended");
        self.end_gesture(&mut actions);
        actions
    }

    /// Whether any layer's geometry differs from its gesture-start rect.
    fn moved_from<I: IntoIterator<Item = (LayerId, Rect)>>(&self, initial: I) -> bool {
        initial
            .into_iter()
            .any(|(id, start)| self.layer(&id).is_some_and(|l| l.rect().differs_from(&start, GEOMETRY_EPSILON)))
    }

    /// Select (or deselect) every layer overlapping the screen-space marquee.
    fn resolve_marquee(&mut self, marquee_screen: Rect) {
        let a = self.viewport.screen_to_canvas(Point::new(marquee_screen.x, marquee_screen.y));
        let b = self
            .viewport
            .screen_to_canvas(Point::new(marquee_screen.right(), marquee_screen.bottom()));
        let area = Rect::from_corners(a, b);
        let hits: Vec<LayerId> = self
            .layers
            .iter()
            .filter(|l| l.rect().intersects(&area))
            .map(|l| l.id)
            .collect();
        debug!(hits = hits.len(), subtract = self.ui.deselect_mode, "marquee resolved");
        if self.ui.deselect_mode {
            self.ui.selection.subtract(&hits);
        } else {
            self.ui.selection.extend(hits);
        }
    }

    fn end_gesture(&mut self, actions: &mut Vec<Action>) {
        self.input = GestureState::Idle;
        self.ui.guides.clear();
        self.ui.marquee = None;
        actions.push(Action::ReleasePointer);
        actions.push(Action::SetCursor("default".into()));
        actions.push(Action::RenderNeeded);
    }

    /// Abort the active gesture, restoring the document to the last committed state.
    ///
    /// Used for window blur, pointer-cancel and lost pointer capture. Also clears
    /// the held-Alt flag so a missed key-up cannot leave alt-drag armed.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        let input = std::mem::take(&mut self.input);
        self.ui.alt_held = false;
        let mut actions = Vec::new();
        if input.is_idle() {
            return actions;
        }

        debug!(gesture = input.name(), "gesture cancelled");
        if matches!(input, GestureState::Dragging { .. } | GestureState::Resizing { .. }) {
            let committed = self.history.current().to_vec();
            if committed != self.layers {
                self.layers = committed;
                actions.push(Action::LayersChanged);
            }
            let before = self.ui.selection.clone();
            if let GestureState::Dragging { prior_selection, .. } = input {
                self.ui.selection = prior_selection;
            }
            self.ui.selection.prune(&self.layers);
            if self.ui.selection != before {
                actions.push(Action::SelectionChanged);
            }
        }
        self.end_gesture(&mut actions);
        actions
    }

    /// Window lost focus: drop any orphaned gesture and modifier state.
    pub fn on_blur(&mut self) -> Vec<Action> {
        self.cancel_gesture()
    }

    // --- Touch input ---

    /// Touch points changed to `touches` (page coordinates). Two touches start a pinch.
    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        let [first, second, ..] = touches else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if !self.input.is_idle() {
            actions.extend(self.cancel_gesture());
        }

        let a = self.client_to_screen(*first);
        let b = self.client_to_screen(*second);
        self.input = GestureState::Pinching {
            start_distance: a.distance(b).max(f64::EPSILON),
            start_zoom: self.viewport.zoom,
            start_pan: Point::new(self.viewport.pan_x, self.viewport.pan_y),
            centroid: a.midpoint(b),
        };
        debug!("pinch started");
        actions
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        let [first, second, ..] = touches else {
            return Vec::new();
        };
        let GestureState::Pinching { start_distance, start_zoom, start_pan, centroid } = self.input else {
            return Vec::new();
        };

        let a = self.client_to_screen(*first);
        let b = self.client_to_screen(*second);
        let zoom = viewport::clamp_zoom(start_zoom * a.distance(b) / start_distance);
        let anchor_canvas = Point::new((centroid.x - start_pan.x) / start_zoom, (centroid.y - start_pan.y) / start_zoom);
        self.viewport.zoom = zoom;
        self.viewport.pan_x = centroid.x - anchor_canvas.x * zoom;
        self.viewport.pan_y = centroid.y - anchor_canvas.y * zoom;
        vec![Action::ViewportChanged, Action::RenderNeeded]
    }

    /// Touches lifted; `remaining` is how many are still down.
    pub fn on_touch_end(&mut self, remaining: usize) -> Vec<Action> {
        if remaining < 2 && matches!(self.input, GestureState::Pinching { .. }) {
            self.input = GestureState::Idle;
            debug!("pinch ended");
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    // --- Wheel / keyboard ---

    /// Ctrl/Cmd + wheel zooms at the pointer; a plain wheel pans.
    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            let factor = (-delta.dy * WHEEL_ZOOM_SENSITIVITY).exp();
            let anchor = self.client_to_screen(client);
            self.viewport.zoom_at_point(self.viewport.zoom * factor, anchor);
        } else {
            self.viewport.pan_x -= delta.dx;
            self.viewport.pan_y -= delta.dy;
        }
        vec![Action::ViewportChanged, Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is("Alt") {
            self.ui.alt_held = true;
            return Vec::new();
        }
        if key.is("Escape") {
            if self.is_gesture_active() {
                return self.cancel_gesture();
            }
            return rejected(self.clear_selection());
        }
        if key.is("Delete") || key.is("Backspace") {
            return rejected(self.delete_selected());
        }
        if modifiers.command() {
            if key.is("z") {
                return rejected(if modifiers.shift { self.redo() } else { self.undo() });
            }
            if key.is("y") {
                return rejected(self.redo());
            }
            if key.is("a") {
                return rejected(self.select_all());
            }
            if key.is("d") {
                return rejected(self.duplicate_selected());
            }
        }
        if key.is("]") {
            return rejected(self.bring_to_front());
        }
        if key.is("[") {
            return rejected(self.send_to_back());
        }
        Vec::new()
    }

    pub fn on_key_up(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is("Alt") {
            self.ui.alt_held = false;
        }
        Vec::new()
    }

    // --- Commands (toolbar / keyboard) ---
    //
    // Commands that touch layers, selection or history are refused while a
    // pointer gesture owns the document.

    /// Create layers for decoded images, select them, and commit.
    ///
    /// `position` is the first layer's top-left; by default the batch is placed
    /// at the viewport center.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn import_images(&mut self, images: Vec<ImageImport>, position: Option<Point>) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        if images.is_empty() {
            return Ok(Vec::new());
        }
        let origin = position.unwrap_or_else(|| self.viewport.canvas_center(self.container_size()));
        let imported = import_layers(images, origin);
        info!(count = imported.len(), "imported images");

        let mut next = self.layers.clone();
        self.ui.selection.replace(imported.iter().map(|l| l.id));
        next.extend(imported);
        let mut actions = self.replace_layers(next);
        actions.push(Action::SelectionChanged);
        Ok(actions)
    }

    /// Restore the previous history entry.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn undo(&mut self) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        let snapshot = self.history.undo();
        Ok(self.restore(snapshot))
    }

    /// Re-apply the next history entry.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn redo(&mut self) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        let snapshot = self.history.redo();
        Ok(self.restore(snapshot))
    }

    fn restore(&mut self, snapshot: Option<Vec<Layer>>) -> Vec<Action> {
        let Some(layers) = snapshot else {
            return Vec::new();
        };
        self.layers = layers;
        let mut actions = vec![Action::LayersChanged];
        if self.ui.selection.prune(&self.layers) > 0 {
            actions.push(Action::SelectionChanged);
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn delete_selected(&mut self) -> Result<Vec<Action>, EngineError> {
        let ids = self.ui.selection.ids().clone();
        self.delete_layers(&ids)
    }

    /// Remove layers by id and prune them from the selection.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn delete_layers(&mut self, ids: &HashSet<LayerId>) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        Ok(self.replace_layers(ops::delete(&self.layers, ids)))
    }

    /// Copy one layer (offset) on top of the stack and select the copy.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active;
    /// [`EngineError::LayerNotFound`] for an unknown id.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        let (next, copy_id) = ops::duplicate(&self.layers, id).ok_or(EngineError::LayerNotFound(id))?;
        self.ui.selection.select_only(copy_id);
        let mut actions = self.replace_layers(next);
        actions.push(Action::SelectionChanged);
        Ok(actions)
    }

    /// Copy every selected layer (offset) on top of the stack and select the copies.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn duplicate_selected(&mut self) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        if self.ui.selection.is_empty() {
            return Ok(Vec::new());
        }
        let (next, copy_ids) = ops::duplicate_many(&self.layers, self.ui.selection.ids(), DUPLICATE_OFFSET);
        self.ui.selection.replace(copy_ids);
        let mut actions = self.replace_layers(next);
        actions.push(Action::SelectionChanged);
        Ok(actions)
    }

    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn bring_to_front(&mut self) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        Ok(self.replace_layers(ops::bring_to_front(&self.layers, self.ui.selection.ids())))
    }

    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn send_to_back(&mut self) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        Ok(self.replace_layers(ops::send_to_back(&self.layers, self.ui.selection.ids())))
    }

    /// Move one layer to `new_index` in the stacking order.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active;
    /// [`EngineError::LayerNotFound`] for an unknown id.
    pub fn move_layer(&mut self, id: LayerId, new_index: usize) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        let next = ops::move_layer(&self.layers, id, new_index).ok_or(EngineError::LayerNotFound(id))?;
        Ok(self.replace_layers(next))
    }

    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn select_all(&mut self) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        self.ui.selection.replace(ops::select_all(&self.layers));
        Ok(vec![Action::SelectionChanged, Action::RenderNeeded])
    }

    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn clear_selection(&mut self) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        if self.ui.selection.is_empty() {
            return Ok(Vec::new());
        }
        self.ui.selection.clear();
        Ok(vec![Action::SelectionChanged, Action::RenderNeeded])
    }

    /// Remove every layer.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn clear_canvas(&mut self) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        Ok(self.replace_layers(ops::clear()))
    }

    /// Pack the scoped layers into the configured grid around the viewport center.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn apply_grid(&mut self) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        let center = self.viewport.canvas_center(self.container_size());
        info!(rows = ?self.settings.grid_rows, cols = ?self.settings.grid_cols, "grid layout");
        let next = layout::grid_layout(&self.layers, &self.ui.selection, &self.settings, center);
        Ok(self.replace_layers(next))
    }

    /// Concatenate the scoped layers along `direction`.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn apply_stitch(&mut self, direction: StitchDirection) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        info!(?direction, smart = self.settings.smart_stitch, "auto-stitch");
        let next = layout::auto_stitch(&self.layers, &self.ui.selection, &self.settings, direction);
        Ok(self.replace_layers(next))
    }

    /// Align the selected group within the canvas page.
    ///
    /// The page starts at the canvas origin and spans one container's worth of
    /// canvas at the current zoom, so `left`/`top` always land on 0 whatever
    /// the pan.
    ///
    /// # Errors
    ///
    /// [`EngineError::GestureInProgress`] while a gesture is active.
    pub fn align(&mut self, alignment: Alignment) -> Result<Vec<Action>, EngineError> {
        self.ensure_idle()?;
        let frame = self.alignment_frame();
        info!(?alignment, "align selection");
        let next = layout::align(&self.layers, &self.ui.selection, alignment, frame);
        Ok(self.replace_layers(next))
    }

    fn alignment_frame(&self) -> Rect {
        let visible = self.viewport.visible_rect(self.container_size());
        Rect::new(0.0, 0.0, visible.width, visible.height)
    }

    // --- Viewport commands ---

    /// Zoom to `zoom`, keeping `anchor` (screen space) fixed; defaults to the container center.
    pub fn zoom_at_point(&mut self, zoom: f64, anchor: Option<Point>) -> Vec<Action> {
        let anchor = anchor.unwrap_or_else(|| self.container_size().center());
        self.viewport.zoom_at_point(zoom, anchor);
        vec![Action::ViewportChanged, Action::RenderNeeded]
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.zoom_at_point(self.viewport.zoom * ZOOM_STEP, None)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.zoom_at_point(self.viewport.zoom / ZOOM_STEP, None)
    }

    pub fn reset_zoom(&mut self) -> Vec<Action> {
        self.zoom_at_point(1.0, None)
    }

    /// Frame every layer in the container.
    pub fn fit_to_content(&mut self) -> Vec<Action> {
        self.viewport = viewport::fit_to_content(self.export_bounds(ExportScope::All), self.container_size());
        vec![Action::ViewportChanged, Action::RenderNeeded]
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the overlay canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given overlay canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let mut engine = Self { canvas, core: EngineCore::new() };
        engine.sync_container();
        engine
    }

    // --- Viewport ---

    /// Update container dimensions and device pixel ratio, then resize the backing store.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.dpr = dpr.max(1.0);
        self.canvas.set_width((width_css.max(0.0) * self.core.dpr) as u32);
        self.canvas.set_height((height_css.max(0.0) * self.core.dpr) as u32);
        self.sync_container();
        let origin = self.core.container_origin();
        self.core.set_container(origin, Size::new(width_css, height_css));
    }

    /// Read the element's page position so pointer coordinates can be localized.
    pub fn sync_container(&mut self) {
        let rect = self.canvas.get_bounding_client_rect();
        self.core
            .set_container(Point::new(rect.left(), rect.top()), Size::new(rect.width(), rect.height()));
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(client, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(client, modifiers)
    }

    pub fn on_pointer_up(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(client, button, modifiers)
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.core.cancel_gesture()
    }

    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        self.core.on_touch_start(touches)
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        self.core.on_touch_move(touches)
    }

    pub fn on_touch_end(&mut self, remaining: usize) -> Vec<Action> {
        self.core.on_touch_end(remaining)
    }

    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(client, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn on_key_up(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_up(key, modifiers)
    }

    pub fn on_blur(&mut self) -> Vec<Action> {
        self.core.on_blur()
    }

    // --- Render ---

    /// Draw the interaction overlay to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        render::draw(&ctx, &self.core)
    }
}
