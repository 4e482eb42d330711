//! quire-editor-search: literal find & replace over a quire document.
//!
//! The engine is split the way a search runs:
//! - `pattern` escapes the term and compiles it with the case and whole-word options
//! - `scan` walks text runs and records every match with absolute positions
//! - `cursor` tracks the current match and steps with wrap-around
//! - `replace` builds single and bulk replacement transactions
//! - `decoration` projects matches into styled ranges and remaps them after edits
//! - `session` ties these together behind the commands a panel calls
//! - `panel` models the panel itself, including input debounce
//!
//! Everything is synchronous. Document changes go through
//! [`quire_editor_core::EditorHost::dispatch`], so each replace is one undo step.

pub mod config;
pub mod cursor;
pub mod decoration;
pub mod error;
pub mod panel;
pub mod pattern;
pub mod replace;
pub mod scan;
pub mod session;

pub use config::SearchConfig;
pub use cursor::MatchCursor;
pub use decoration::{Decoration, DecorationKind, DecorationSet, MappedDecorations, project};
pub use error::{PatternError, SearchError};
pub use panel::{InputDebouncer, PanelView, SearchPanel};
pub use pattern::{Pattern, SearchOptions};
pub use scan::{MatchRecord, scan, scan_limited};
pub use session::SearchSession;
