//! Short-term tabu memory.

use std::collections::VecDeque;

use super::types::Move;

/// A remembered move and the iterations it stays forbidden.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TabuEntry {
    mv: Move,
    remaining: usize,
}

/// Recently applied moves with per-move tenure.
///
/// Entries start at the full tenure, are refreshed when the same move is
/// added again, lose one unit per [`decrement_all`](Self::decrement_all),
/// and are evicted when they reach zero. Size is bounded by eviction, not by
/// a fixed capacity.
///
/// # Examples
///
/// ```
/// use u_dagsched::tabu::{Move, TabuMemory};
///
/// let mut memory = TabuMemory::new(2);
/// memory.add(Move::SwapOrder { i: 1, j: 4 });
/// assert!(memory.contains(&Move::SwapOrder { i: 4, j: 1 }));
///
/// memory.decrement_all();
/// memory.decrement_all();
/// assert!(!memory.contains(&Move::SwapOrder { i: 1, j: 4 }));
/// ```
#[derive(Debug, Clone)]
pub struct TabuMemory {
    tenure: usize,
    entries: VecDeque<TabuEntry>,
}

impl TabuMemory {
    /// Creates an empty memory with the given tenure.
    pub fn new(tenure: usize) -> Self {
        Self {
            tenure,
            entries: VecDeque::new(),
        }
    }

    /// Configured tenure.
    pub fn tenure(&self) -> usize {
        self.tenure
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no move is currently remembered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records `mv`, resetting its tenure if an equivalent move is present.
    pub fn add(&mut self, mv: Move) {
        match self.entries.iter_mut().find(|e| e.mv == mv) {
            Some(entry) => entry.remaining = self.tenure,
            None => self.entries.push_back(TabuEntry {
                mv,
                remaining: self.tenure,
            }),
        }
    }

    /// Whether an equivalent move is currently forbidden.
    pub fn contains(&self, mv: &Move) -> bool {
        self.entries.iter().any(|e| e.mv == *mv && e.remaining > 0)
    }

    /// Ages every entry by one iteration, evicting expired ones.
    pub fn decrement_all(&mut self) {
        self.entries.retain_mut(|e| {
            e.remaining = e.remaining.saturating_sub(1);
            e.remaining > 0
        });
    }
}
