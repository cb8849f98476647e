//! Per-tab back/forward history.

use serde::Serialize;

use crate::types::history::HistoryEntry;

/// Ordered log of committed navigations with a cursor.
///
/// `index` is `None` while the history is empty (the `-1` position) and
/// otherwise always points at a valid entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    index: Option<usize>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a stack positioned at `index`, clamped to the last entry.
    pub fn from_entries(entries: Vec<HistoryEntry>, index: Option<usize>) -> Self {
        let index = match entries.len() {
            0 => None,
            len => Some(index.unwrap_or(len - 1).min(len - 1)),
        };
        Self { entries, index }
    }

    /// Drops every entry after the cursor, appends `entry`, and moves the
    /// cursor onto it.
    pub fn push(&mut self, entry: HistoryEntry) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(entry);
        self.index = Some(self.entries.len() - 1);
    }

    /// Moves the cursor to `index` without touching the entries.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.index = Some(index);
            true
        } else {
            false
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Cursor as a signed position, `-1` for an empty history.
    pub fn position(&self) -> i64 {
        self.index.map_or(-1, |i| i as i64)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.index.and_then(|i| self.entries.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index one step back from `from`, if any.
    pub fn back_from(&self, from: Option<usize>) -> Option<usize> {
        match from {
            Some(i) if i > 0 && i < self.entries.len() => Some(i - 1),
            _ => None,
        }
    }

    /// Index one step forward from `from`, if any.
    pub fn forward_from(&self, from: Option<usize>) -> Option<usize> {
        match from {
            Some(i) if i + 1 < self.entries.len() => Some(i + 1),
            _ => None,
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.back_from(self.index).is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.forward_from(self.index).is_some()
    }
}
