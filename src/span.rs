//! Character-offset text spans for discourse annotations.
//!
//! Every annotation in a document is anchored to a half-open character
//! range `[char_start, char_end)`. Spans order and compare; the canonical
//! "first-widest" ordering used across the crate sorts ascending by start
//! and, on a tie, widest span first.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

/// A half-open character span `[char_start, char_end)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TextSpan {
    /// Character offset of the first character (inclusive).
    pub char_start: usize,
    /// Character offset one past the last character (exclusive).
    pub char_end: usize,
}

impl TextSpan {
    /// Create a span from character offsets.
    #[must_use]
    pub fn new(char_start: usize, char_end: usize) -> Self {
        Self {
            char_start,
            char_end,
        }
    }

    /// Number of characters covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.char_end.saturating_sub(self.char_start)
    }

    /// True if the span covers no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `other` lies entirely within this span.
    #[must_use]
    pub fn encloses(&self, other: &TextSpan) -> bool {
        self.char_start <= other.char_start && other.char_end <= self.char_end
    }

    /// True if the two spans share at least one character.
    #[must_use]
    pub fn overlaps(&self, other: &TextSpan) -> bool {
        self.char_start < other.char_end && other.char_start < self.char_end
    }

    /// Smallest span enclosing both spans.
    ///
    /// A complex unit's span is the merge of its members' spans, which is
    /// how grouping annotations acquire a position in the text.
    #[must_use]
    pub fn merge(&self, other: &TextSpan) -> TextSpan {
        TextSpan {
            char_start: self.char_start.min(other.char_start),
            char_end: self.char_end.max(other.char_end),
        }
    }

    /// Sort key for the canonical left-to-right, widest-first ordering:
    /// ascending start, then descending end.
    #[must_use]
    pub fn first_widest_key(&self) -> (usize, Reverse<usize>) {
        (self.char_start, Reverse(self.char_end))
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.char_start, self.char_end)
    }
}
