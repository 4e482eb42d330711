//! Visual range markers for matches.
//!
//! A decoration set is a pure projection of the match list and the current
//! index. The one exception is a foreign document edit: then the existing
//! ranges are carried through the host's position mapping, because the
//! document (not the stale offsets) says where the text now lives.

use std::fmt;

use quire_editor_core::PositionMapper;
use tracing::debug;

use crate::config::SearchConfig;
use crate::scan::MatchRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    Match,
    CurrentMatch,
}

impl DecorationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DecorationKind::Match => "match",
            DecorationKind::CurrentMatch => "current-match",
        }
    }

    /// CSS class a renderer should apply.
    pub fn class(self, config: &SearchConfig) -> &str {
        match self {
            DecorationKind::Match => &config.match_class,
            DecorationKind::CurrentMatch => &config.current_match_class,
        }
    }
}

/// A styled range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub kind: DecorationKind,
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{} {}]", self.from, self.to, self.kind.as_str())
    }
}

/// Decorations ordered by position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

/// Result of carrying a decoration set through an edit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappedDecorations {
    pub set: DecorationSet,
    /// For each input decoration, whether it survived.
    pub kept: Vec<bool>,
}

impl MappedDecorations {
    pub fn dropped(&self) -> usize {
        self.kept.iter().filter(|kept| !**kept).count()
    }
}

/// Project matches into decorations. The current match is tagged
/// `CurrentMatch` instead of `Match`, never both.
pub fn project(matches: &[MatchRecord], current: Option<usize>) -> DecorationSet {
    let decorations = matches
        .iter()
        .enumerate()
        .map(|(i, m)| Decoration {
            from: m.from,
            to: m.to,
            kind: if Some(i) == current {
                DecorationKind::CurrentMatch
            } else {
                DecorationKind::Match
            },
        })
        .collect();
    DecorationSet { decorations }
}

impl DecorationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    /// The current-match decoration, if any.
    pub fn current(&self) -> Option<&Decoration> {
        self.decorations
            .iter()
            .find(|d| d.kind == DecorationKind::CurrentMatch)
    }

    /// Decorations overlapping `from..to`, e.g. the visible viewport.
    pub fn find(&self, from: usize, to: usize) -> impl Iterator<Item = &Decoration> {
        self.decorations
            .iter()
            .filter(move |d| d.from < to && d.to > from)
    }

    /// Carry every range through `mapper`.
    ///
    /// A range is dropped if an endpoint was invalidated, if the edit landed
    /// inside it, or if it collapsed to zero width.
    pub fn map(&self, mapper: &impl PositionMapper) -> MappedDecorations {
        let mut decorations = Vec::with_capacity(self.decorations.len());
        let mut kept = Vec::with_capacity(self.decorations.len());
        for deco in &self.decorations {
            match mapper.map_range(deco.from, deco.to) {
                Some((from, to)) if to > from => {
                    decorations.push(Decoration { from, to, ..*deco });
                    kept.push(true);
                }
                _ => kept.push(false),
            }
        }
        let mapped = MappedDecorations {
            set: DecorationSet { decorations },
            kept,
        };
        if mapped.dropped() > 0 {
            debug!(dropped = mapped.dropped(), "dropped decorations after edit");
        }
        mapped
    }
}

impl fmt::Display for DecorationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, deco) in self.decorations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{deco}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.iter()
    }
}
