//! The set of selected layer ids.
//!
//! Selection holds ids only, never geometry. Any operation that removes layers
//! must call [`Selection::prune`] so no id outlives its layer.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashSet;

use crate::doc::{Layer, LayerId};

/// Unordered set of selected layer ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<LayerId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &LayerId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The underlying id set.
    #[must_use]
    pub fn ids(&self) -> &HashSet<LayerId> {
        &self.ids
    }

    /// Replace the selection with exactly one layer.
    pub fn select_only(&mut self, id: LayerId) {
        self.ids.clear();
        self.ids.insert(id);
    }

    /// Replace the selection with `ids`.
    pub fn replace<I: IntoIterator<Item = LayerId>>(&mut self, ids: I) {
        self.ids = ids.into_iter().collect();
    }

    pub fn insert(&mut self, id: LayerId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: &LayerId) -> bool {
        self.ids.remove(id)
    }

    /// Add every id in `ids`.
    pub fn extend<I: IntoIterator<Item = LayerId>>(&mut self, ids: I) {
        self.ids.extend(ids);
    }

    /// Remove every id in `ids`.
    pub fn subtract<'a, I: IntoIterator<Item = &'a LayerId>>(&mut self, ids: I) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids with no corresponding layer. Returns how many were dropped.
    pub fn prune(&mut self, layers: &[Layer]) -> usize {
        let before = self.ids.len();
        let live: HashSet<LayerId> = layers.iter().map(|l| l.id).collect();
        self.ids.retain(|id| live.contains(id));
        before - self.ids.len()
    }

    /// Selected layers in stacking order.
    #[must_use]
    pub fn layers<'a>(&self, layers: &'a [Layer]) -> Vec<&'a Layer> {
        layers.iter().filter(|l| self.ids.contains(&l.id)).collect()
    }
}
