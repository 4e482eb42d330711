//! Error types for document edits.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while applying edits to a document.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    /// A position lies outside the document.
    #[error("position {pos} is outside the document (size {size})")]
    #[diagnostic(code(quire::editor::out_of_range))]
    PositionOutOfRange { pos: usize, size: usize },

    /// An inline edit range is not inside a single textblock.
    #[error("range {from}..{to} is not inside a single textblock")]
    #[diagnostic(
        code(quire::editor::not_in_textblock),
        help("inline edits must stay within one paragraph, heading or code block")
    )]
    NotInTextblock { from: usize, to: usize },

    /// A node cannot be inserted at the given position.
    #[error("cannot insert a node at position {pos}")]
    #[diagnostic(code(quire::editor::invalid_insert))]
    InvalidInsertPosition { pos: usize },

    /// No node starts at the given position.
    #[error("no node starts at position {pos}")]
    #[diagnostic(code(quire::editor::no_node))]
    NoNodeAt { pos: usize },

    /// A step inside a transaction failed; the transaction was not applied.
    #[error("step {index} failed")]
    #[diagnostic(code(quire::editor::step_failed))]
    StepFailed {
        index: usize,
        #[source]
        source: Box<EditorError>,
    },
}
