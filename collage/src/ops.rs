//! Non-gestural operations on the ordered layer list.
//!
//! Every function takes the current list by reference and returns a new list;
//! nothing here mutates its input. Callers replace the document with the result
//! and push a history snapshot.

#[cfg(test)]
#[path = "ops_test.rs"]
mod ops_test;

use std::collections::HashSet;

use uuid::Uuid;

use crate::consts::DUPLICATE_OFFSET;
use crate::doc::{Layer, LayerId};

/// Strip a trailing ` (n)` copy marker, returning the base name.
fn base_name(name: &str) -> &str {
    if let Some(open) = name.rfind(" (") {
        let tail = &name[open + 2..];
        if let Some(digits) = tail.strip_suffix(')') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return &name[..open];
            }
        }
    }
    name
}

/// Next free `"<base> (n)"` name for a copy of `name` among `existing` names.
#[must_use]
pub fn copy_name<'a, I>(name: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let base = base_name(name);
    let prefix = format!("{base} (");
    let highest = existing
        .into_iter()
        .filter_map(|n| n.strip_prefix(prefix.as_str())?.strip_suffix(')'))
        // a non-numeric suffix is a plain name, not a copy index
        .flat_map(str::parse::<u32>)
        .max()
        .unwrap_or(0);
    format!("{base} ({})", highest + 1)
}

fn clone_layer(source: &Layer, taken: &[&str], dx: f64, dy: f64) -> Layer {
    let mut copy = source.clone();
    copy.id = Uuid::new_v4();
    copy.name = copy_name(&source.name, taken.iter().copied());
    copy.x += dx;
    copy.y += dy;
    copy
}

/// Append a copy of `id`, offset by [`DUPLICATE_OFFSET`], as the topmost layer.
///
/// Returns the new list and the copy's id, or `None` when `id` is not present.
#[must_use]
pub fn duplicate(layers: &[Layer], id: LayerId) -> Option<(Vec<Layer>, LayerId)> {
    let source = layers.iter().find(|l| l.id == id)?;
    let names: Vec<&str> = layers.iter().map(|l| l.name.as_str()).collect();
    let copy = clone_layer(source, &names, DUPLICATE_OFFSET, DUPLICATE_OFFSET);
    let copy_id = copy.id;
    let mut out = layers.to_vec();
    out.push(copy);
    Some((out, copy_id))
}

/// Append copies of every layer in `ids` on top of the stack, shifted by `offset`.
///
/// Copies keep their sources' relative order. Returns the new list and the
/// copies' ids, in stacking order.
#[must_use]
pub fn duplicate_many(layers: &[Layer], ids: &HashSet<LayerId>, offset: f64) -> (Vec<Layer>, Vec<LayerId>) {
    let mut out = layers.to_vec();
    let mut new_ids = Vec::new();
    for source in layers.iter().filter(|l| ids.contains(&l.id)) {
        let names: Vec<&str> = out.iter().map(|l| l.name.as_str()).collect();
        let copy = clone_layer(source, &names, offset, offset);
        new_ids.push(copy.id);
        out.push(copy);
    }
    (out, new_ids)
}

/// Remove every layer in `ids`, preserving the order of survivors.
#[must_use]
pub fn delete(layers: &[Layer], ids: &HashSet<LayerId>) -> Vec<Layer> {
    layers.iter().filter(|l| !ids.contains(&l.id)).cloned().collect()
}

fn partition(layers: &[Layer], ids: &HashSet<LayerId>) -> (Vec<Layer>, Vec<Layer>) {
    layers.iter().cloned().partition(|l| ids.contains(&l.id))
}

/// Move the layers in `ids` to the top, keeping each group's internal order.
#[must_use]
pub fn bring_to_front(layers: &[Layer], ids: &HashSet<LayerId>) -> Vec<Layer> {
    let (mut selected, mut rest) = partition(layers, ids);
    rest.append(&mut selected);
    rest
}

/// Move the layers in `ids` to the bottom, keeping each group's internal order.
#[must_use]
pub fn send_to_back(layers: &[Layer], ids: &HashSet<LayerId>) -> Vec<Layer> {
    let (mut selected, mut rest) = partition(layers, ids);
    selected.append(&mut rest);
    selected
}

/// Move one layer to `new_index` in the stack (clamped to the list bounds).
///
/// Returns `None` when `id` is not present.
#[must_use]
pub fn move_layer(layers: &[Layer], id: LayerId, new_index: usize) -> Option<Vec<Layer>> {
    let from = layers.iter().position(|l| l.id == id)?;
    let mut out = layers.to_vec();
    let layer = out.remove(from);
    let to = new_index.min(out.len());
    out.insert(to, layer);
    Some(out)
}

/// Ids of every current layer.
#[must_use]
pub fn select_all(layers: &[Layer]) -> HashSet<LayerId> {
    layers.iter().map(|l| l.id).collect()
}

/// The empty document.
#[must_use]
pub fn clear() -> Vec<Layer> {
    Vec::new()
}
