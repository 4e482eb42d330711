//! Undo/redo management for editor operations.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `History` - per-transaction undo/redo stacks of inverse steps
//!
//! One history entry is recorded per transaction, so a transaction that
//! touches many places (a bulk replace, say) undoes as a single step.

use crate::transaction::Step;

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track state.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns true if successful.
    fn undo(&mut self) -> bool;

    /// Perform redo. Returns true if successful.
    fn redo(&mut self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// Steps that revert one transaction, in application order.
pub type HistoryEntry = Vec<Step>;

/// Bounded undo and redo stacks.
#[derive(Clone, Debug)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_steps: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    /// Create a history keeping at most `max_steps` undo entries.
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    /// Record a new user-visible change. Clears the redo stack.
    pub fn record(&mut self, inverse: HistoryEntry) {
        self.redo_stack.clear();
        self.push_undo(inverse);
    }

    /// Push an undo entry without touching the redo stack.
    pub fn push_undo(&mut self, inverse: HistoryEntry) {
        if inverse.is_empty() {
            return;
        }
        self.undo_stack.push(inverse);

        // Trim if over max
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }
    }

    pub fn push_redo(&mut self, inverse: HistoryEntry) {
        if !inverse.is_empty() {
            self.redo_stack.push(inverse);
        }
    }

    pub fn peek_undo(&self) -> Option<&HistoryEntry> {
        self.undo_stack.last()
    }

    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.redo_stack.last()
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo_stack.pop()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
