//! Search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Tunables for a search session and its panel.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Initial value of the case-sensitive option.
    pub case_sensitive: bool,
    /// Initial value of the whole-word option.
    pub whole_word: bool,
    /// How long the panel waits for typing to settle before rescanning.
    pub debounce_ms: u64,
    /// Maximum number of matches a scan collects. 0 means unlimited.
    ///
    /// Replace all only touches the collected matches, then rescans for the
    /// rest.
    pub max_matches: usize,
    /// Compiled pattern size limit in bytes.
    pub pattern_size_limit: usize,
    /// CSS class for ordinary match decorations.
    pub match_class: String,
    /// CSS class for the current match decoration.
    pub current_match_class: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            debounce_ms: 10,
            max_matches: 0,
            pattern_size_limit: 1 << 20,
            match_class: "search-result".to_owned(),
            current_match_class: "search-result-current".to_owned(),
        }
    }
}

impl SearchConfig {
    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, SearchError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// `max_matches` as an optional limit.
    pub fn match_limit(&self) -> Option<usize> {
        (self.max_matches > 0).then_some(self.max_matches)
    }
}
