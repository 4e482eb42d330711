//! The ordered match list and which match is current.

use crate::scan::MatchRecord;

/// Matches from the latest scan plus the index of the current one.
///
/// Invariant: `current` is `None` exactly when `matches` is empty, and is
/// otherwise a valid index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchCursor {
    matches: Vec<MatchRecord>,
    current: Option<usize>,
}

impl MatchCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the matches after a fresh scan; the first match becomes current.
    pub fn reset(&mut self, matches: Vec<MatchRecord>) {
        self.current = if matches.is_empty() { None } else { Some(0) };
        self.matches = matches;
    }

    /// Replace the matches and make `current` current, clamped to the list.
    pub fn reset_at(&mut self, matches: Vec<MatchRecord>, current: usize) {
        self.current = match matches.len() {
            0 => None,
            len => Some(current.min(len - 1)),
        };
        self.matches = matches;
    }

    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&MatchRecord> {
        self.current.and_then(|i| self.matches.get(i))
    }

    /// Step forward, wrapping from the last match to the first.
    pub fn next(&mut self) -> Option<&MatchRecord> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        let next = self.current.map_or(0, |i| (i + 1) % len);
        self.current = Some(next);
        self.matches.get(next)
    }

    /// Step backward, wrapping from the first match to the last.
    pub fn previous(&mut self) -> Option<&MatchRecord> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        let prev = self.current.map_or(len - 1, |i| (i + len - 1) % len);
        self.current = Some(prev);
        self.matches.get(prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> MatchCursor {
        let mut cursor = MatchCursor::new();
        cursor.reset(vec![
            MatchRecord::new(1, 4, "cat"),
            MatchRecord::new(5, 8, "cat"),
            MatchRecord::new(9, 12, "cat"),
        ]);
        cursor
    }

    #[test]
    fn test_reset_selects_first() {
        let cursor = three();
        assert_eq!(cursor.current_index(), Some(0));

        let mut empty = three();
        empty.reset(Vec::new());
        assert_eq!(empty.current_index(), None);
    }

    #[test]
    fn test_next_wraps() {
        let mut cursor = three();
        cursor.reset_at(cursor.matches().to_vec(), 2);
        assert_eq!(cursor.next().map(|m| m.from), Some(1));
        assert_eq!(cursor.current_index(), Some(0));
    }

    #[test]
    fn test_previous_wraps() {
        let mut cursor = three();
        assert_eq!(cursor.previous().map(|m| m.from), Some(9));
        assert_eq!(cursor.current_index(), Some(2));
        assert_eq!(cursor.previous().map(|m| m.from), Some(5));
    }

    #[test]
    fn test_empty_is_noop() {
        let mut cursor = MatchCursor::new();
        assert!(cursor.next().is_none());
        assert!(cursor.previous().is_none());
        assert_eq!(cursor.current_index(), None);
    }

    #[test]
    fn test_reset_at_clamps() {
        let mut cursor = three();
        cursor.reset_at(cursor.matches()[..2].to_vec(), 7);
        assert_eq!(cursor.current_index(), Some(1));
    }
}
