//! Bounded undo/redo history.

use std::collections::VecDeque;

use crate::config::HISTORY_CAPACITY;
use crate::events::EventBatch;
use crate::model::{NodeId, ProvisionTree};

/// One recorded transition.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Batch emitted when the transition was first applied.
    pub batch: EventBatch,
    /// Tree to restore when the entry is popped: the state before the
    /// transition on the undo stack, the state after it on the redo stack.
    pub snapshot: ProvisionTree,
    /// Provisions the transition moved without changing their ids.
    pub moved: Vec<NodeId>,
}

/// Ring buffer of history entries; the oldest entry is evicted on overflow.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push an entry, evicting the oldest if at capacity.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
            tracing::debug!(capacity = self.capacity, "Evicted oldest history entry");
        }
        self.entries.push_back(entry);
    }

    /// Take the most recent entry.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(marker: usize) -> HistoryEntry {
        HistoryEntry {
            batch: EventBatch::new(),
            snapshot: ProvisionTree::new(),
            moved: vec![NodeId::new(marker as u32)],
        }
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = HistoryBuffer::new(3);
        for marker in 0..5 {
            history.push(entry(marker));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.pop().unwrap().moved, vec![NodeId::new(4)]);
        assert_eq!(history.pop().unwrap().moved, vec![NodeId::new(3)]);
        assert_eq!(history.pop().unwrap().moved, vec![NodeId::new(2)]);
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(HistoryBuffer::default().capacity(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = HistoryBuffer::new(0);
        history.push(entry(1));
        assert!(history.is_empty());
    }
}
