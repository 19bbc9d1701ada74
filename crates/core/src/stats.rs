use core::ops::{Add, AddAssign};

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::syllables::{count_text, count_words};

/// Whole-text counters shown next to an editor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    /// Number of lines (a trailing newline does not open a new one).
    pub lines: usize,
    /// Whitespace-delimited words.
    pub words: usize,
    /// Syllables, counted word by word.
    pub syllables: usize,
    /// Unicode scalar values, newlines included.
    pub chars: usize,
}

impl TextStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().count(),
            words: count_words(text),
            syllables: count_text(text),
            chars: bytecount::num_chars(text.as_bytes()),
        }
    }
}

impl Add for TextStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            lines: self.lines + rhs.lines,
            words: self.words + rhs.words,
            syllables: self.syllables + rhs.syllables,
            chars: self.chars + rhs.chars,
        }
    }
}

impl AddAssign for TextStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl core::iter::Sum for TextStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), Add::add)
    }
}

/// How a line was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Verse,
    Blank,
    /// A song section marker such as `[ Estribillo ]`.
    Section,
}

/// Metric feedback for one line of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMetric {
    /// 1-based line number.
    pub line: usize,
    pub kind: LineKind,
    /// The line, trimmed.
    pub text: String,
    pub syllables: usize,
    /// Verse name, or `—` when the line has no syllables.
    pub verse: String,
}

/// Statistics plus per-line metrics for a text.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub stats: TextStats,
    pub lines: Vec<LineMetric>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_for_empty_text() {
        assert_eq!(TextStats::from_text(""), TextStats::new());
    }

    #[test]
    fn stats_count_every_axis() {
        let stats = TextStats::from_text("Caminante, no hay camino,\nse hace camino al andar.\n");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.words, 9);
        assert_eq!(stats.syllables, 18);
        assert_eq!(stats.chars, 51);
    }

    #[test]
    fn stats_add_up() {
        let a = TextStats::from_text("uno");
        let b = TextStats::from_text("dos tres");
        let total: TextStats = [a, b].into_iter().sum();
        assert_eq!(total.words, 3);
        assert_eq!(total.syllables, a.syllables + b.syllables);

        let mut acc = a;
        acc += b;
        assert_eq!(acc, total);
    }
}
