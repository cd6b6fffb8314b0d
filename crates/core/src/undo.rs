//! Snapshot-based undo for destructive page edits.
//!
//! Each entry is a full serialized copy of the document taken immediately
//! before a page deletion. The stack is bounded: pushing beyond the
//! configured depth evicts the oldest snapshot.

use std::collections::VecDeque;

#[derive(Debug)]
pub struct UndoStack {
    snapshots: VecDeque<Vec<u8>>,
    depth: usize,
}

impl UndoStack {
    pub fn new(depth: usize) -> Self {
        Self { snapshots: VecDeque::new(), depth: depth.max(1) }
    }

    pub fn push(&mut self, snapshot: Vec<u8>) {
        self.snapshots.push_back(snapshot);

        while self.snapshots.len() > self.depth {
            self.snapshots.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.snapshots.pop_back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total bytes retained across all snapshots.
    pub fn retained_bytes(&self) -> usize {
        self.snapshots.iter().map(Vec::len).sum()
    }
}
