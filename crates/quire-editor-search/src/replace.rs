//! Building replacement transactions.
//!
//! Replacing everything happens in one transaction whose steps run from the
//! last match to the first. Each step only moves text after its own range,
//! so the earlier matches' offsets are still valid when their turn comes.

use quire_editor_core::node::char_to_byte;
use quire_editor_core::{Document, Origin, Transaction};

use crate::scan::MatchRecord;

/// Transaction replacing a single match with `replacement`.
pub fn replace_one(record: &MatchRecord, replacement: &str) -> Transaction {
    Transaction::new()
        .replace_text(record.from, record.to, replacement)
        .with_origin(Origin::Search)
}

/// Transaction replacing every match with `replacement`.
///
/// `matches` must be ordered by position and non-overlapping, as a scan
/// produces them.
pub fn replace_every(matches: &[MatchRecord], replacement: &str) -> Transaction {
    matches
        .iter()
        .rev()
        .fold(Transaction::new(), |tr, m| {
            tr.replace_text(m.from, m.to, replacement)
        })
        .with_origin(Origin::Search)
}

/// Whether the document still holds each match's text at its range.
pub fn still_matches(doc: &Document, matches: &[MatchRecord]) -> bool {
    verify(doc, matches).into_iter().all(|ok| ok)
}

/// For each match, whether its range still holds its text inside a single
/// text run.
///
/// Runs and matches are walked together in one pass, so `matches` should be
/// ordered by position. Out-of-order input is still answered correctly, only
/// slower.
pub fn verify(doc: &Document, matches: &[MatchRecord]) -> Vec<bool> {
    let runs: Vec<(usize, usize, &str)> = doc
        .text_runs()
        .into_iter()
        .map(|(start, run)| (start, start + run.len_chars(), run.text.as_str()))
        .collect();

    let mut run = 0;
    // Char and byte offsets already walked inside `runs[run]`.
    let mut walked_chars = 0;
    let mut walked_bytes = 0;

    matches
        .iter()
        .map(|m| {
            let behind = match runs.get(run) {
                Some(&(start, _, _)) => m.from < start,
                None => runs.last().is_some_and(|&(_, end, _)| m.from < end),
            };
            if behind {
                run = 0;
                walked_chars = 0;
                walked_bytes = 0;
            }
            while runs.get(run).is_some_and(|&(_, end, _)| end <= m.from) {
                run += 1;
                walked_chars = 0;
                walked_bytes = 0;
            }
            let Some(&(start, end, text)) = runs.get(run) else {
                return false;
            };
            if m.from < start || m.to > end {
                return false;
            }

            let local = m.from - start;
            if local < walked_chars {
                walked_chars = 0;
                walked_bytes = 0;
            }
            walked_bytes += char_to_byte(&text[walked_bytes..], local - walked_chars);
            walked_chars = local;

            text[walked_bytes..].starts_with(m.text.as_str())
                && m.text.chars().count() == m.len()
        })
        .collect()
}
