//! Turning a raw search term into a literal matcher.
//!
//! The term is always matched literally: every regex metacharacter is
//! escaped before compiling.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::PatternError;

/// What the user is searching for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Raw search text. Empty means no active search.
    pub term: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl SearchOptions {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    pub fn whole_word(mut self, value: bool) -> Self {
        self.whole_word = value;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }
}

/// A compiled search term.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

/// Default compiled size limit, generous for anything typed into a search box.
pub const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

impl Pattern {
    /// Compile `options.term` with the default size limit.
    pub fn compile(options: &SearchOptions) -> Result<Self, PatternError> {
        Self::compile_with_limit(options, DEFAULT_SIZE_LIMIT)
    }

    /// Compile `options.term`, failing if the matcher would exceed `size_limit` bytes.
    pub fn compile_with_limit(
        options: &SearchOptions,
        size_limit: usize,
    ) -> Result<Self, PatternError> {
        if options.term.is_empty() {
            return Err(PatternError::Empty);
        }

        let escaped = regex::escape(&options.term);
        let source = if options.whole_word {
            format!(r"\b{escaped}\b")
        } else {
            escaped
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .size_limit(size_limit)
            .build()
            .map_err(|source| PatternError::Invalid {
                term: options.term.clone(),
                source,
            })?;
        Ok(Self { regex })
    }

    /// Byte ranges of the non-overlapping matches in `text`, left to right.
    pub fn find_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Range<usize>> + 'a {
        self.regex.find_iter(text).map(|m| m.range())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The compiled source, after escaping and anchoring.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
