//! Per-editor search state and the commands a panel drives.
//!
//! A session never owns the editor. Every command that reads the document
//! borrows the host, and every command that changes it goes through
//! [`EditorHost::dispatch`]. Failures are logged and degrade to no-ops; the
//! caller only ever observes the match list and the current index.

use quire_editor_core::{Document, EditorHost, Origin, PositionMapper, Selection, Transaction};
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::cursor::MatchCursor;
use crate::decoration::{DecorationSet, project};
use crate::pattern::{Pattern, SearchOptions};
use crate::replace::{replace_every, replace_one, still_matches, verify};
use crate::scan::{MatchRecord, scan_limited};

/// Search state for one editor instance.
#[derive(Clone, Debug, Default)]
pub struct SearchSession {
    config: SearchConfig,
    options: SearchOptions,
    replace_term: String,
    cursor: MatchCursor,
    decorations: DecorationSet,
    /// Set when an outside edit invalidated a match. The next command that
    /// needs the match list rescans first.
    stale: bool,
}

impl SearchSession {
    pub fn new(config: SearchConfig) -> Self {
        let options = SearchOptions::default()
            .case_sensitive(config.case_sensitive)
            .whole_word(config.whole_word);
        Self {
            config,
            options,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn search_term(&self) -> &str {
        &self.options.term
    }

    pub fn replace_term(&self) -> &str {
        &self.replace_term
    }

    /// Matches from the latest scan, ordered by position.
    pub fn results(&self) -> &[MatchRecord] {
        self.cursor.matches()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.cursor.current_index()
    }

    pub fn current_match(&self) -> Option<&MatchRecord> {
        self.cursor.current()
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Set the term and rescan. An empty term clears the search.
    pub fn set_search_term(&mut self, host: &impl EditorHost, term: impl Into<String>) {
        self.options.term = term.into();
        self.update_find_results(host);
    }

    pub fn set_case_sensitive(&mut self, host: &impl EditorHost, case_sensitive: bool) {
        self.options.case_sensitive = case_sensitive;
        self.update_find_results(host);
    }

    pub fn set_whole_word(&mut self, host: &impl EditorHost, whole_word: bool) {
        self.options.whole_word = whole_word;
        self.update_find_results(host);
    }

    /// Set the replacement text. Matches are left alone.
    pub fn set_replace_term(&mut self, term: impl Into<String>) {
        self.replace_term = term.into();
    }

    /// Rescan the whole document. The first match becomes current.
    pub fn update_find_results(&mut self, host: &impl EditorHost) {
        if !self.options.is_active() {
            self.clear_search();
            return;
        }
        let matches = self.scan_document(host.document());
        self.cursor.reset(matches);
        self.stale = false;
        self.refresh_decorations();
    }

    /// Move to the next match, wrapping around, and select it.
    ///
    /// Returns false when there is nothing to move to.
    pub fn find_next(&mut self, host: &mut impl EditorHost) -> bool {
        self.ensure_fresh(host.document());
        let Some(record) = self.cursor.next().cloned() else {
            return false;
        };
        self.refresh_decorations();
        self.select(host, &record);
        true
    }

    /// Move to the previous match, wrapping around, and select it.
    pub fn find_previous(&mut self, host: &mut impl EditorHost) -> bool {
        self.ensure_fresh(host.document());
        let Some(record) = self.cursor.previous().cloned() else {
            return false;
        };
        self.refresh_decorations();
        self.select(host, &record);
        true
    }

    /// Replace the current match with the replace term, then rescan.
    ///
    /// Returns false if there is no current match or the host rejected the
    /// edit.
    pub fn replace_current(&mut self, host: &mut impl EditorHost) -> bool {
        self.ensure_fresh(host.document());
        let Some(mut record) = self.cursor.current().cloned() else {
            return false;
        };
        if !still_matches(host.document(), std::slice::from_ref(&record)) {
            debug!(from = record.from, "current match drifted, rescanning");
            self.rescan_keeping_place(host.document());
            match self.cursor.current() {
                Some(fresh) => record = fresh.clone(),
                None => return false,
            }
        }

        match host.dispatch(replace_one(&record, &self.replace_term)) {
            Ok(_) => {
                debug!(from = record.from, to = record.to, "replaced current match");
                self.update_find_results(&*host);
                true
            }
            Err(err) => {
                warn!(error = %err, "replace rejected by editor");
                false
            }
        }
    }

    /// Replace every match in one transaction and return how many were
    /// replaced.
    ///
    /// The match list is emptied afterwards and not rescanned, so a
    /// replacement containing the term is not reported as a new match until
    /// the next rescan. The exception is a scan that stopped at
    /// `max_matches`: only the capped matches are replaced, and the document
    /// is rescanned so the remaining occurrences show up.
    pub fn replace_all(&mut self, host: &mut impl EditorHost) -> usize {
        self.ensure_fresh(host.document());
        if !still_matches(host.document(), self.cursor.matches()) {
            debug!("matches drifted, rescanning before replace all");
            self.rescan_keeping_place(host.document());
        }
        let count = self.cursor.len();
        if count == 0 {
            return 0;
        }

        match host.dispatch(replace_every(self.cursor.matches(), &self.replace_term)) {
            Ok(_) => {
                debug!(count, "replaced all matches");
                if self.config.match_limit().is_some_and(|limit| count >= limit) {
                    self.update_find_results(&*host);
                } else {
                    self.cursor.clear();
                    self.refresh_decorations();
                }
                count
            }
            Err(err) => {
                warn!(error = %err, "replace all rejected by editor");
                0
            }
        }
    }

    /// Forget the term and every match. Options and the replace term stay.
    pub fn clear_search(&mut self) {
        self.options.term.clear();
        self.cursor.clear();
        self.decorations = DecorationSet::empty();
        self.stale = false;
    }

    /// Follow an edit the session did not make.
    ///
    /// Matches are carried through `mapper`. A match whose range was edited,
    /// or whose text no longer reads the same, is dropped and the session is
    /// marked stale so the next command rescans. Edits the session made
    /// itself are ignored because it rescans after them anyway.
    pub fn handle_transaction(
        &mut self,
        mapper: &impl PositionMapper,
        origin: Origin,
        doc: &Document,
    ) {
        if origin == Origin::Search || self.cursor.is_empty() {
            return;
        }

        let mapped = self.decorations.map(mapper);
        let mut ranges = mapped.set.iter();
        let mut moved = Vec::with_capacity(self.cursor.len());
        let mut previous_index = Vec::with_capacity(self.cursor.len());
        for (i, (record, kept)) in self.cursor.matches().iter().zip(&mapped.kept).enumerate() {
            if !kept {
                continue;
            }
            let Some(range) = ranges.next() else {
                break;
            };
            moved.push(MatchRecord::new(range.from, range.to, record.text.clone()));
            previous_index.push(i);
        }

        let current = self.cursor.current_index();
        let valid = verify(doc, &moved);
        let mut survivors = Vec::with_capacity(moved.len());
        // Survivors before the old current match; its new index if it survived.
        let mut current_slot = 0;
        for ((record, i), ok) in moved.into_iter().zip(previous_index).zip(valid) {
            if !ok {
                continue;
            }
            if current.is_some_and(|c| i < c) {
                current_slot += 1;
            }
            survivors.push(record);
        }

        let dropped = self.cursor.len() - survivors.len();
        if dropped > 0 {
            debug!(dropped, ?origin, "matches invalidated by edit");
            self.stale = true;
        }
        self.cursor.reset_at(survivors, current_slot);
        self.refresh_decorations();
    }

    fn scan_document(&self, doc: &Document) -> Vec<MatchRecord> {
        match Pattern::compile_with_limit(&self.options, self.config.pattern_size_limit) {
            Ok(pattern) => scan_limited(&pattern, doc, self.config.match_limit()),
            Err(err) => {
                warn!(error = %err, "search term rejected, treating as no matches");
                Vec::new()
            }
        }
    }

    fn ensure_fresh(&mut self, doc: &Document) {
        if self.stale && self.options.is_active() {
            self.rescan_keeping_place(doc);
        }
    }

    /// Rescan, keeping the current match at the first result at or after
    /// where the old one started.
    fn rescan_keeping_place(&mut self, doc: &Document) {
        let anchor = self.cursor.current().map(|m| m.from);
        let matches = self.scan_document(doc);
        let current = anchor
            .and_then(|from| matches.iter().position(|m| m.from >= from))
            .unwrap_or(0);
        debug!(count = matches.len(), current, "rescanned stale matches");
        self.cursor.reset_at(matches, current);
        self.stale = false;
        self.refresh_decorations();
    }

    fn refresh_decorations(&mut self) {
        self.decorations = project(self.cursor.matches(), self.cursor.current_index());
    }

    fn select(&self, host: &mut impl EditorHost, record: &MatchRecord) {
        let tr = Transaction::new()
            .set_selection(Selection::new(record.from, record.to))
            .scroll_into_view()
            .with_origin(Origin::Search);
        match host.dispatch(tr) {
            Ok(_) => debug!(
                from = record.from,
                to = record.to,
                current = ?self.cursor.current_index(),
                "selected match"
            ),
            Err(err) => warn!(error = %err, "could not select match"),
        }
    }
}
