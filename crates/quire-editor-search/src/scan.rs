//! Finding every occurrence of a pattern in a document.
//!
//! Each text run is searched on its own. A match never spans two runs, so
//! text whose formatting changes halfway through (half bold, half plain) is
//! not found as one occurrence. This mirrors how the document stores text.

use quire_editor_core::Document;
use smol_str::SmolStr;
use tracing::debug;

use crate::pattern::Pattern;

/// One occurrence of the search term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MatchRecord {
    /// Inclusive start position.
    pub from: usize,
    /// Exclusive end position. Always greater than `from`.
    pub to: usize,
    /// The exact matched text.
    pub text: SmolStr,
}

impl MatchRecord {
    pub fn new(from: usize, to: usize, text: impl Into<SmolStr>) -> Self {
        Self {
            from,
            to,
            text: text.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.to == self.from
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.from..self.to
    }
}

/// All matches of `pattern` in `doc`, ordered by position.
pub fn scan(pattern: &Pattern, doc: &Document) -> Vec<MatchRecord> {
    scan_limited(pattern, doc, None)
}

/// Like [`scan`], stopping after `limit` matches.
pub fn scan_limited(pattern: &Pattern, doc: &Document, limit: Option<usize>) -> Vec<MatchRecord> {
    let mut matches = Vec::new();
    let limit = limit.unwrap_or(usize::MAX);

    'runs: for (base, run) in doc.text_runs() {
        let text = run.text.as_str();
        // Regex offsets are bytes; positions are chars. Walk forward once per run.
        let mut last_byte = 0;
        let mut last_char = 0;
        for bytes in pattern.find_iter(text) {
            if bytes.is_empty() {
                continue;
            }
            if matches.len() >= limit {
                debug!(limit, "match limit reached");
                break 'runs;
            }
            let start = last_char + text[last_byte..bytes.start].chars().count();
            let matched = &text[bytes.clone()];
            let end = start + matched.chars().count();
            matches.push(MatchRecord::new(base + start, base + end, matched));
            last_byte = bytes.end;
            last_char = end;
        }
    }

    debug!(pattern = pattern.as_str(), count = matches.len(), "scanned document");
    matches
}
