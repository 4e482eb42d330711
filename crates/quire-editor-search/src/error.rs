//! Error types for the search engine.
//!
//! Engine commands absorb these (logging them) and degrade to no-ops; only
//! configuration loading hands them back to the embedding host.

use miette::Diagnostic;
use quire_editor_core::EditorError;
use thiserror::Error;

/// A search term could not be turned into a matcher.
#[derive(Error, Debug, Diagnostic, Clone)]
#[non_exhaustive]
pub enum PatternError {
    /// The term was empty. Callers clear the search instead of compiling.
    #[error("search term is empty")]
    #[diagnostic(code(quire::search::empty_term))]
    Empty,

    /// The escaped term still failed to compile, or exceeded the size limit.
    #[error("could not compile search term {term:?}")]
    #[diagnostic(code(quire::search::invalid_pattern))]
    Invalid {
        term: String,
        #[source]
        source: regex::Error,
    },
}

/// Main error type for search operations.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum SearchError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Pattern(#[from] PatternError),

    /// Search configuration could not be parsed.
    #[error("invalid search configuration: {0}")]
    #[diagnostic(code(quire::search::config))]
    Config(#[from] serde_json::Error),

    /// The host rejected a transaction proposed by the engine.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Dispatch(#[from] EditorError),
}
