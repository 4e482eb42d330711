//! Editor host trait and a plain field-based implementation.
//!
//! `EditorHost` is the narrow surface that editor extensions (search,
//! toolbars, panels) see: read access to the document and selection, and a
//! single dispatch entry point for every change. Routing all edits through
//! `dispatch` keeps undo history and selection consistent.

use tracing::{debug, warn};

use crate::document::Document;
use crate::error::EditorError;
use crate::mapping::{Mapping, PositionMapper};
use crate::transaction::{Applied, Transaction};
use crate::types::{Bias, Origin, Selection};
use crate::undo::{History, UndoManager};

/// The interface an editor exposes to its extensions.
pub trait EditorHost {
    /// The current document.
    fn document(&self) -> &Document;

    /// The current selection.
    fn selection(&self) -> Selection;

    /// Apply a transaction. This is the only way the document changes.
    ///
    /// Returns the mapping from pre- to post-transaction positions.
    fn dispatch(&mut self, tr: Transaction) -> Result<Mapping, EditorError>;
}

/// Simple field-based editor with undo support.
///
/// Use this for non-reactive contexts or as a base for testing.
#[derive(Clone, Debug)]
pub struct Editor {
    doc: Document,
    selection: Selection,
    history: History,
    scroll_target: Option<Selection>,
    dispatch_count: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl Editor {
    /// Create an editor for the given document.
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            selection: Selection::default(),
            history: History::default(),
            scroll_target: None,
            dispatch_count: 0,
        }
    }

    /// Limit how many transactions can be undone.
    pub fn with_history_depth(mut self, max_steps: usize) -> Self {
        self.history = History::new(max_steps);
        self
    }

    /// Last range a transaction asked to scroll into view.
    pub fn scroll_target(&self) -> Option<Selection> {
        self.scroll_target
    }

    /// Number of transactions applied so far.
    pub fn dispatch_count(&self) -> usize {
        self.dispatch_count
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Build the transaction that undoes the latest change, without applying it.
    pub fn undo_transaction(&self) -> Option<Transaction> {
        let steps = self.history.peek_undo()?;
        Some(
            steps
                .iter()
                .cloned()
                .fold(Transaction::new(), Transaction::step)
                .with_origin(Origin::Undo),
        )
    }

    /// Build the transaction that redoes the latest undone change.
    pub fn redo_transaction(&self) -> Option<Transaction> {
        let steps = self.history.peek_redo()?;
        Some(
            steps
                .iter()
                .cloned()
                .fold(Transaction::new(), Transaction::step)
                .with_origin(Origin::Redo),
        )
    }

    fn record_history(&mut self, tr: &Transaction, applied: Applied) {
        match tr.origin() {
            Origin::Undo => {
                self.history.pop_undo();
                self.history.push_redo(applied.inverse);
            }
            Origin::Redo => {
                self.history.pop_redo();
                self.history.push_undo(applied.inverse);
            }
            _ if tr.doc_changed() && tr.adds_to_history() => self.history.record(applied.inverse),
            _ => {}
        }
    }

    fn map_selection(&self, mapping: &Mapping) -> Selection {
        let size = self.doc.content_size();
        let map = |pos: usize| {
            mapping
                .map_position(pos, Bias::Left)
                .pos()
                .unwrap_or(pos)
                .min(size)
        };
        Selection::new(map(self.selection.anchor), map(self.selection.head))
    }
}

impl EditorHost for Editor {
    fn document(&self) -> &Document {
        &self.doc
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn dispatch(&mut self, tr: Transaction) -> Result<Mapping, EditorError> {
        let applied = tr.apply(&mut self.doc)?;
        let mapping = applied.mapping.clone();
        self.dispatch_count += 1;

        self.selection = match tr.selection() {
            Some(sel) => {
                let size = self.doc.content_size();
                Selection::new(sel.anchor.min(size), sel.head.min(size))
            }
            None => self.map_selection(&mapping),
        };
        if tr.scrolls_into_view() {
            self.scroll_target = Some(self.selection);
        }

        self.record_history(&tr, applied);
        debug!(
            origin = ?tr.origin(),
            steps = tr.steps().len(),
            undo_depth = self.history.undo_depth(),
            "dispatched transaction"
        );
        Ok(mapping)
    }
}

impl UndoManager for Editor {
    fn can_undo(&self) -> bool {
        self.history.peek_undo().is_some()
    }

    fn can_redo(&self) -> bool {
        self.history.peek_redo().is_some()
    }

    fn undo(&mut self) -> bool {
        let Some(tr) = self.undo_transaction() else {
            return false;
        };
        match self.dispatch(tr) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "undo failed");
                false
            }
        }
    }

    fn redo(&mut self) -> bool {
        let Some(tr) = self.redo_transaction() else {
            return false;
        };
        match self.dispatch(tr) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "redo failed");
                false
            }
        }
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_editor(paragraphs: &[&str]) -> Editor {
        Editor::new(Document::from_paragraphs(paragraphs))
    }

    #[test]
    fn test_dispatch_maps_selection() {
        let mut editor = make_editor(&["hello world"]);
        editor
            .dispatch(Transaction::new().set_selection(Selection::new(7, 12)))
            .unwrap();

        editor
            .dispatch(Transaction::new().insert_text(1, ">> "))
            .unwrap();
        assert_eq!(editor.selection(), Selection::new(10, 15));
    }

    #[test]
    fn test_scroll_into_view() {
        let mut editor = make_editor(&["hello"]);
        assert_eq!(editor.scroll_target(), None);
        editor
            .dispatch(
                Transaction::new()
                    .set_selection(Selection::new(1, 3))
                    .scroll_into_view(),
            )
            .unwrap();
        assert_eq!(editor.scroll_target(), Some(Selection::new(1, 3)));
    }

    #[test]
    fn test_undo_redo() {
        let mut editor = make_editor(&["hello"]);

        editor
            .dispatch(Transaction::new().insert_text(6, " world"))
            .unwrap();
        assert_eq!(editor.document().text_content(), "hello world");

        assert!(editor.undo());
        assert_eq!(editor.document().text_content(), "hello");

        assert!(editor.redo());
        assert_eq!(editor.document().text_content(), "hello world");
        assert!(!editor.can_redo());
    }

    #[test]
    fn test_multi_step_transaction_is_one_undo_step() {
        let mut editor = make_editor(&["a a a"]);
        editor
            .dispatch(
                Transaction::new()
                    .replace_text(5, 6, "b")
                    .replace_text(3, 4, "b")
                    .replace_text(1, 2, "b"),
            )
            .unwrap();
        assert_eq!(editor.document().text_content(), "b b b");
        assert_eq!(editor.history().undo_depth(), 1);

        assert!(editor.undo());
        assert_eq!(editor.document().text_content(), "a a a");
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_selection_only_transaction_skips_history() {
        let mut editor = make_editor(&["hello"]);
        editor
            .dispatch(Transaction::new().set_selection(Selection::collapsed(2)))
            .unwrap();
        assert!(!editor.can_undo());
        assert_eq!(editor.dispatch_count(), 1);
    }

    #[test]
    fn test_failed_dispatch_changes_nothing() {
        let mut editor = make_editor(&["hello"]);
        let before = editor.document().clone();
        assert!(editor
            .dispatch(Transaction::new().replace_text(2, 50, "x"))
            .is_err());
        assert_eq!(editor.document(), &before);
        assert_eq!(editor.dispatch_count(), 0);
    }
}
