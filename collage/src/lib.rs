//! Canvas interaction and layout engine for the image collage editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! layer document, the pan/zoom viewport, the pointer gesture state machine,
//! snapping, the layout algorithms (stitch, grid, alignment) and the undo
//! history. The host JavaScript layer wires DOM events to the engine, draws the
//! layer images, and reacts to the [`engine::Action`]s the engine returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Layer type, image import, document format, export bounds |
//! | [`ops`] | Pure list operations: duplicate, delete, z-order, reorder |
//! | [`selection`] | Selected layer ids and their pruning |
//! | [`layout`] | Auto-stitch, grid layout and group alignment |
//! | [`history`] | Linear undo/redo over layer-list snapshots |
//! | [`settings`] | Editor settings consumed by gestures and layouts |
//! | [`viewport`] | Pan/zoom transform and coordinate conversions |
//! | [`geom`] | Rectangles, bounding boxes and handle resizing |
//! | [`snap`] | Snap target search and guide lines |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against layers and resize handles |
//! | [`render`] | Overlay rendering: selection, handles, guides, marquee |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod history;
pub mod hit;
pub mod input;
pub mod layout;
pub mod ops;
pub mod render;
pub mod selection;
pub mod settings;
pub mod snap;
pub mod viewport;
