//! Position mapping through document edits.
//!
//! Every applied step produces a [`StepMap`] describing the single range it
//! replaced. A [`Mapping`] chains step maps so positions from before a
//! transaction can be carried to where the same content lives afterwards.

use crate::types::Bias;

/// Result of mapping a position through an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapResult {
    /// The position survived and now lives here.
    Mapped(usize),
    /// The content around the position was replaced.
    Invalidated,
}

impl MapResult {
    pub fn pos(self) -> Option<usize> {
        match self {
            MapResult::Mapped(pos) => Some(pos),
            MapResult::Invalidated => None,
        }
    }
}

/// Anything that can carry old positions to new ones.
pub trait PositionMapper {
    /// Map a single position.
    ///
    /// Positions strictly inside a replaced range are invalidated. Positions
    /// on the edge of a pure insertion follow `bias`.
    fn map_position(&self, pos: usize, bias: Bias) -> MapResult;

    /// Map a range, keeping it only if its content was left untouched.
    ///
    /// Insertions at either edge stay outside the range. Returns `None` when
    /// an endpoint was invalidated or an edit landed inside the range.
    fn map_range(&self, from: usize, to: usize) -> Option<(usize, usize)> {
        let new_from = self.map_position(from, Bias::Right).pos()?;
        let new_to = self.map_position(to, Bias::Left).pos()?;
        if new_to < new_from || new_to - new_from != to - from {
            return None;
        }
        Some((new_from, new_to))
    }
}

/// The position change produced by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepMap {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl StepMap {
    pub fn new(start: usize, old_size: usize, new_size: usize) -> Self {
        Self {
            start,
            old_size,
            new_size,
        }
    }
}

impl PositionMapper for StepMap {
    fn map_position(&self, pos: usize, bias: Bias) -> MapResult {
        let end = self.start + self.old_size;
        if pos < self.start {
            return MapResult::Mapped(pos);
        }
        if pos > end {
            return MapResult::Mapped(pos - self.old_size + self.new_size);
        }
        if self.old_size == 0 {
            // Pure insertion exactly at pos.
            return match bias {
                Bias::Left => MapResult::Mapped(pos),
                Bias::Right => MapResult::Mapped(pos + self.new_size),
            };
        }
        if pos == self.start {
            MapResult::Mapped(self.start)
        } else if pos == end {
            MapResult::Mapped(self.start + self.new_size)
        } else {
            MapResult::Invalidated
        }
    }
}

/// An ordered chain of step maps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, map: StepMap) {
        self.maps.push(map);
    }
}

impl PositionMapper for Mapping {
    fn map_position(&self, pos: usize, bias: Bias) -> MapResult {
        let mut pos = pos;
        for map in &self.maps {
            match map.map_position(pos, bias) {
                MapResult::Mapped(next) => pos = next,
                MapResult::Invalidated => return MapResult::Invalidated,
            }
        }
        MapResult::Mapped(pos)
    }
}

impl FromIterator<StepMap> for Mapping {
    fn from_iter<I: IntoIterator<Item = StepMap>>(iter: I) -> Self {
        Self {
            maps: iter.into_iter().collect(),
        }
    }
}
