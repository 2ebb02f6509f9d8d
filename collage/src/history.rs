//! Linear undo/redo over full layer-list snapshots.
//!
//! Every entry is an owned deep copy of the layer list, so later edits to the
//! live document can never reach back into history. Pushing after an undo
//! discards the redo branch.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::doc::Layer;

/// Snapshot stack with a cursor at the current entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Vec<Layer>>,
    index: usize,
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl History {
    /// Start a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: Vec<Layer>) -> Self {
        Self { entries: vec![initial], index: 0, limit: None }
    }

    /// Start a history that keeps at most `limit` entries (minimum 1).
    #[must_use]
    pub fn with_limit(initial: Vec<Layer>, limit: usize) -> Self {
        Self { entries: vec![initial], index: 0, limit: Some(limit.max(1)) }
    }

    /// Record a new current state, truncating any redo-able entries.
    pub fn push(&mut self, snapshot: Vec<Layer>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        self.index = self.entries.len() - 1;

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
                self.index -= excess;
            }
        }
    }

    /// Step back one entry. Returns a copy of the new current state, or `None` at the start.
    pub fn undo(&mut self) -> Option<Vec<Layer>> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index].clone())
    }

    /// Step forward one entry. Returns a copy of the new current state, or `None` at the end.
    pub fn redo(&mut self) -> Option<Vec<Layer>> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> &[Layer] {
        &self.entries[self.index]
    }

    /// Cursor position (0 = initial state).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of stored entries, including the initial one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least its initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and restart from `initial`.
    pub fn reset(&mut self, initial: Vec<Layer>) {
        self.entries = vec![initial];
        self.index = 0;
    }
}
