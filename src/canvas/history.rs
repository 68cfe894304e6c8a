//! Snapshot-based undo/redo log.
//!
//! Every committed edit appends a full deep copy of the element collection.
//! The log is a sliding window of at most [`MAX_HISTORY`] entries with a
//! cursor pointing at the snapshot currently shown on the canvas.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::element::ReportElement;

/// Maximum number of snapshots kept in the log.
pub const MAX_HISTORY: usize = 50;

/// An immutable snapshot of the full element collection.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub elements: Vec<ReportElement>,
    pub timestamp: DateTime<Utc>,
}

/// Ordered snapshot log with a current index.
///
/// Invariant: the log is never empty and `index < entries.len()`.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    index: usize,
    max_size: usize,
}

impl History {
    /// Start a log whose only entry is a snapshot of `elements`.
    pub fn new(elements: &[ReportElement]) -> Self {
        Self::with_max_size(elements, MAX_HISTORY)
    }

    pub fn with_max_size(elements: &[ReportElement], max_size: usize) -> Self {
        let max_size = max_size.max(1);
        let mut entries = VecDeque::with_capacity(max_size + 1);
        entries.push_back(snapshot(elements));
        Self {
            entries,
            index: 0,
            max_size,
        }
    }

    /// Append a snapshot, discarding any redo future first.
    ///
    /// At capacity the oldest entry is evicted and the index stays put, since
    /// the window shifted underneath it.
    pub fn push(&mut self, elements: &[ReportElement]) {
        self.entries.truncate(self.index + 1);
        self.entries.push_back(snapshot(elements));

        if self.entries.len() > self.max_size {
            self.entries.pop_front();
        } else {
            self.index += 1;
        }
    }

    /// Step back one entry, returning a deep copy of its elements.
    pub fn undo(&mut self) -> Option<Vec<ReportElement>> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.current().elements.clone())
    }

    /// Step forward one entry, returning a deep copy of its elements.
    pub fn redo(&mut self) -> Option<Vec<ReportElement>> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.current().elements.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

fn snapshot(elements: &[ReportElement]) -> HistoryEntry {
    HistoryEntry {
        elements: elements.to_vec(),
        timestamp: Utc::now(),
    }
}
