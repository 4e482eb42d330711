//! The model behind a find & replace panel.
//!
//! Rendering is left to the embedding UI. This module owns what the panel
//! shows ("2 of 5", which buttons are enabled) and the input debounce, so
//! rapid keystrokes turn into one rescan. Time is always passed in by the
//! caller.

use std::time::Duration;

use quire_editor_core::EditorHost;
use tracing::debug;
use web_time::Instant;

use crate::config::SearchConfig;
use crate::session::SearchSession;

/// Snapshot of what the panel displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelView {
    pub total: usize,
    pub current: Option<usize>,
    /// "N of M" with a one-based N, "0 of M" without a current match.
    pub label: String,
    /// Next/previous are enabled.
    pub can_navigate: bool,
    /// Replace is enabled.
    pub can_replace: bool,
}

impl PanelView {
    pub fn from_session(session: &SearchSession) -> Self {
        let total = session.results().len();
        let current = session.current_index();
        let label = match current {
            Some(i) => format!("{} of {}", i + 1, total),
            None => format!("0 of {total}"),
        };
        Self {
            total,
            current,
            label,
            can_navigate: total > 0,
            can_replace: current.is_some(),
        }
    }

    /// Current index with -1 for "none", for UIs that want a plain integer.
    pub fn signed_index(&self) -> isize {
        self.current.map_or(-1, |i| i as isize)
    }
}

/// Holds the latest input until it has been quiet for `delay`.
#[derive(Clone, Debug)]
pub struct InputDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl InputDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record new input, replacing anything still pending and restarting
    /// the delay.
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.delay));
    }

    /// The pending value, once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.flush(),
            _ => None,
        }
    }

    /// The pending value, regardless of the delay.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// A search session plus the panel's open state and input debounce.
#[derive(Clone, Debug)]
pub struct SearchPanel {
    session: SearchSession,
    input: InputDebouncer,
    open: bool,
}

impl SearchPanel {
    pub fn new(config: SearchConfig) -> Self {
        let input = InputDebouncer::new(config.debounce());
        Self {
            session: SearchSession::new(config),
            input,
            open: false,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close the panel, dropping pending input and clearing the search.
    pub fn close(&mut self) {
        self.open = false;
        self.input.cancel();
        self.session.clear_search();
    }

    /// Queue a new search term. It is applied by [`tick`](Self::tick) once
    /// typing has paused.
    pub fn type_search_term(&mut self, term: impl Into<String>, now: Instant) {
        self.input.push(term, now);
    }

    /// Apply queued input whose delay has elapsed. Returns whether a rescan
    /// happened.
    pub fn tick(&mut self, host: &impl EditorHost, now: Instant) -> bool {
        match self.input.poll(now) {
            Some(term) => {
                debug!(term = %term, "applying debounced search term");
                self.session.set_search_term(host, term);
                true
            }
            None => false,
        }
    }

    /// Apply queued input immediately.
    pub fn flush(&mut self, host: &impl EditorHost) {
        if let Some(term) = self.input.flush() {
            self.session.set_search_term(host, term);
        }
    }

    pub fn toggle_case_sensitive(&mut self, host: &impl EditorHost) {
        self.flush(host);
        let value = !self.session.options().case_sensitive;
        self.session.set_case_sensitive(host, value);
    }

    pub fn toggle_whole_word(&mut self, host: &impl EditorHost) {
        self.flush(host);
        let value = !self.session.options().whole_word;
        self.session.set_whole_word(host, value);
    }

    pub fn set_replace_term(&mut self, term: impl Into<String>) {
        self.session.set_replace_term(term);
    }

    pub fn next(&mut self, host: &mut impl EditorHost) -> bool {
        self.flush(&*host);
        self.session.find_next(host)
    }

    pub fn previous(&mut self, host: &mut impl EditorHost) -> bool {
        self.flush(&*host);
        self.session.find_previous(host)
    }

    pub fn replace(&mut self, host: &mut impl EditorHost) -> bool {
        self.flush(&*host);
        self.session.replace_current(host)
    }

    pub fn replace_all(&mut self, host: &mut impl EditorHost) -> usize {
        self.flush(&*host);
        self.session.replace_all(host)
    }

    pub fn view(&self) -> PanelView {
        PanelView::from_session(&self.session)
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }
}
