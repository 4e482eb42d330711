//! quire-editor-core: the rich-text document model editor extensions build on.
//!
//! This crate provides:
//! - `Document` - a tree of typed nodes with flat positional addressing
//! - `Transaction` / `Step` - atomic edits that report a position `Mapping`
//! - `EditorHost` - the read + dispatch surface extensions are written against
//! - `Editor` - plain field-based host with grouped undo/redo

pub mod document;
pub mod editor;
pub mod error;
pub mod mapping;
pub mod node;
pub mod transaction;
pub mod types;
pub mod undo;

pub use document::Document;
pub use editor::{Editor, EditorHost};
pub use error::EditorError;
pub use mapping::{MapResult, Mapping, PositionMapper, StepMap};
pub use node::{Atom, Element, ElementKind, Mark, Node, TextRun};
pub use smol_str::SmolStr;
pub use transaction::{Applied, Step, Transaction};
pub use types::{Bias, Origin, Selection};
pub use undo::{History, UndoManager};
