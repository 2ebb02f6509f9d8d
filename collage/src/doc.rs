//! Document model: image layers, image import, and the persisted document.
//!
//! The ordered `Vec<Layer>` is the whole mutable document: a layer's index is
//! its stacking order (later = drawn on top). Selection and history refer to
//! layers by [`LayerId`] only.
//!
//! Data flows into this layer from image decode (the host reports pixel
//! dimensions and a source reference) and from saved documents (JSON). The
//! export collaborator reads [`export_bounds`] and [`export_scale`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{IMPORT_CASCADE_OFFSET, MIN_LAYER_SIZE};
use crate::geom::{Rect, bounding_box};
use crate::settings::AppSettings;
use crate::viewport::Point;

/// Unique identifier for a layer.
pub type LayerId = Uuid;

/// Current version of the persisted document format.
pub const DOCUMENT_VERSION: u32 = 1;

/// One positioned image on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Unique identifier, stable for the layer's lifetime.
    pub id: LayerId,
    /// Opaque reference to the pixel data (object URL, data URI, path).
    pub src: String,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    /// Width in canvas units; never below [`MIN_LAYER_SIZE`].
    pub width: f64,
    /// Height in canvas units; never below [`MIN_LAYER_SIZE`].
    pub height: f64,
    /// Display name (usually the file name).
    pub name: String,
    /// Decoded pixel width of the source image, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_width: Option<f64>,
    /// Decoded pixel height of the source image, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_height: Option<f64>,
}

impl Layer {
    /// Create a layer with a fresh id. Size is floored to the minimum.
    #[must_use]
    pub fn new(src: impl Into<String>, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            src: src.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width.max(MIN_LAYER_SIZE),
            height: rect.height.max(MIN_LAYER_SIZE),
            name: name.into(),
            original_width: None,
            original_height: None,
        }
    }

    /// Current geometry.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Overwrite geometry, flooring width and height to the minimum size.
    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width.max(MIN_LAYER_SIZE);
        self.height = rect.height.max(MIN_LAYER_SIZE);
    }
}

/// A decoded image handed to the core for layer creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageImport {
    pub src: String,
    pub name: String,
    /// Decoded pixel width.
    pub width: f64,
    /// Decoded pixel height.
    pub height: f64,
}

/// Create one layer per decoded image.
///
/// The batch is ordered by name (case-insensitive, then exact) before layers are
/// created, so the resulting slice is name-sorted regardless of the order the
/// files were picked or decoded in. The first layer's top-left sits at `origin`;
/// each following layer is cascaded by [`IMPORT_CASCADE_OFFSET`].
#[must_use]
pub fn import_layers(mut images: Vec<ImageImport>, origin: Point) -> Vec<Layer> {
    images.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });

    images
        .into_iter()
        .enumerate()
        .map(|(i, image)| {
            #[allow(clippy::cast_precision_loss)]
            let offset = i as f64 * IMPORT_CASCADE_OFFSET;
            let rect = Rect::new(origin.x + offset, origin.y + offset, image.width, image.height);
            let mut layer = Layer::new(image.src, image.name, rect);
            layer.original_width = Some(image.width);
            layer.original_height = Some(image.height);
            layer
        })
        .collect()
}

/// Which layers an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ExportScope {
    All,
    Layer(LayerId),
}

fn in_export_scope(layers: &[Layer], scope: ExportScope) -> impl Iterator<Item = &Layer> {
    layers.iter().filter(move |l| match scope {
        ExportScope::All => true,
        ExportScope::Layer(id) => l.id == id,
    })
}

/// Tight bounding box of the in-scope layers; `None` when nothing is in scope.
#[must_use]
pub fn export_bounds(layers: &[Layer], scope: ExportScope) -> Option<Rect> {
    bounding_box(in_export_scope(layers, scope).map(Layer::rect))
}

/// Pixel scale at which an export keeps every in-scope layer at source fidelity.
///
/// This is the largest `original / displayed` ratio over both axes, never below 1.
#[must_use]
pub fn export_scale(layers: &[Layer], scope: ExportScope) -> f64 {
    in_export_scope(layers, scope)
        .flat_map(|l| {
            [
                l.original_width.map(|ow| ow / l.width),
                l.original_height.map(|oh| oh / l.height),
            ]
        })
        .flatten()
        .filter(|s| s.is_finite())
        .fold(1.0, f64::max)
}

/// The persisted form of a collage: plain layer attributes plus settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollageDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub settings: AppSettings,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl Default for CollageDocument {
    fn default() -> Self {
        Self { version: DOCUMENT_VERSION, layers: Vec::new(), settings: AppSettings::default() }
    }
}

impl CollageDocument {
    /// Parse a document from JSON, flooring any undersized layer.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        for layer in &mut doc.layers {
            let rect = layer.rect();
            layer.set_rect(rect);
        }
        Ok(doc)
    }

    /// Serialize the document to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
