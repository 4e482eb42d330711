//! Transactions: atomic groups of steps applied to a document.
//!
//! A transaction is the only way a document changes. Its steps are applied
//! in order, each expressed in the coordinates left by the previous one.
//! Applying is all-or-nothing: if any step fails, the document is restored.

use smol_str::SmolStr;
use tracing::{debug, instrument};

use crate::document::Document;
use crate::error::EditorError;
use crate::mapping::{Mapping, StepMap};
use crate::node::Node;
use crate::types::{Origin, Selection};

/// A single document change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Replace an inline range with text that inherits the marks at `from`.
    ReplaceText { from: usize, to: usize, text: SmolStr },
    /// Replace an inline range with the given inline nodes.
    ReplaceInline {
        from: usize,
        to: usize,
        content: Vec<Node>,
    },
    /// Insert a node at a position.
    InsertNode { pos: usize, node: Node },
    /// Remove the node that starts at a position.
    RemoveNode { pos: usize },
}

impl Step {
    /// Apply the step, returning its position map and the step that undoes it.
    pub(crate) fn apply(&self, doc: &mut Document) -> Result<(StepMap, Step), EditorError> {
        match self {
            Step::ReplaceText { from, to, text } => {
                let removed = doc.replace_text(*from, *to, text)?;
                let inserted = text.chars().count();
                Ok((
                    StepMap::new(*from, to - from, inserted),
                    Step::ReplaceInline {
                        from: *from,
                        to: from + inserted,
                        content: removed,
                    },
                ))
            }
            Step::ReplaceInline { from, to, content } => {
                let inserted: usize = content.iter().map(Node::size).sum();
                let removed = doc.replace_inline(*from, *to, content.clone())?;
                Ok((
                    StepMap::new(*from, to - from, inserted),
                    Step::ReplaceInline {
                        from: *from,
                        to: from + inserted,
                        content: removed,
                    },
                ))
            }
            Step::InsertNode { pos, node } => {
                let size = node.size();
                doc.insert_node(*pos, node.clone())?;
                Ok((StepMap::new(*pos, 0, size), Step::RemoveNode { pos: *pos }))
            }
            Step::RemoveNode { pos } => {
                let node = doc.remove_node(*pos)?;
                Ok((
                    StepMap::new(*pos, node.size(), 0),
                    Step::InsertNode { pos: *pos, node },
                ))
            }
        }
    }
}

/// An atomic edit proposal.
#[derive(Clone, Debug)]
pub struct Transaction {
    steps: Vec<Step>,
    selection: Option<Selection>,
    scroll_into_view: bool,
    origin: Origin,
    add_to_history: bool,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            selection: None,
            scroll_into_view: false,
            origin: Origin::User,
            add_to_history: true,
        }
    }

    /// Add a step.
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Replace an inline range with text.
    pub fn replace_text(self, from: usize, to: usize, text: impl Into<SmolStr>) -> Self {
        self.step(Step::ReplaceText {
            from,
            to,
            text: text.into(),
        })
    }

    /// Insert text at a position.
    pub fn insert_text(self, pos: usize, text: impl Into<SmolStr>) -> Self {
        self.replace_text(pos, pos, text)
    }

    /// Delete an inline range.
    pub fn delete(self, from: usize, to: usize) -> Self {
        self.replace_text(from, to, "")
    }

    /// Set the selection after the steps are applied.
    ///
    /// The selection is expressed in post-transaction coordinates.
    pub fn set_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Ask the host to scroll the selection into view.
    pub fn scroll_into_view(mut self) -> Self {
        self.scroll_into_view = true;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Keep this transaction out of the undo history.
    pub fn without_history(mut self) -> Self {
        self.add_to_history = false;
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn scrolls_into_view(&self) -> bool {
        self.scroll_into_view
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn adds_to_history(&self) -> bool {
        self.add_to_history
    }

    /// Whether the transaction changes the document.
    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Apply all steps to `doc`.
    ///
    /// On failure the document is left exactly as it was.
    #[instrument(
        level = "debug",
        skip_all,
        fields(steps = self.steps.len(), origin = ?self.origin)
    )]
    pub fn apply(&self, doc: &mut Document) -> Result<Applied, EditorError> {
        let snapshot = doc.clone();
        let mut mapping = Mapping::new();
        let mut inverse = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            match step.apply(doc) {
                Ok((map, undo)) => {
                    mapping.push(map);
                    inverse.push(undo);
                }
                Err(source) => {
                    *doc = snapshot;
                    debug!(index, error = %source, "transaction rolled back");
                    return Err(EditorError::StepFailed {
                        index,
                        source: Box::new(source),
                    });
                }
            }
        }

        // Undo runs the inverse steps back to front.
        inverse.reverse();
        Ok(Applied { mapping, inverse })
    }
}

/// The outcome of applying a transaction.
#[derive(Clone, Debug)]
pub struct Applied {
    /// Carries pre-transaction positions to post-transaction positions.
    pub mapping: Mapping,
    /// Steps that restore the previous document, in application order.
    pub inverse: Vec<Step>,
}
