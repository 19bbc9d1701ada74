//! Verse classification by syllable count.

use alloc::borrow::Cow;
use alloc::format;

use serde::{Deserialize, Serialize};

/// Traditional Spanish verse lengths with a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerseKind {
    Monosilabo,
    Bisilabo,
    Trisilabo,
    Tetrasilabo,
    Pentasilabo,
    Hexasilabo,
    Heptasilabo,
    Octosilabo,
    Eneasilabo,
    Decasilabo,
    Endecasilabo,
    Dodecasilabo,
    Tridecasilabo,
    Alejandrino,
}

impl VerseKind {
    pub const ALL: [Self; 14] = [
        Self::Monosilabo,
        Self::Bisilabo,
        Self::Trisilabo,
        Self::Tetrasilabo,
        Self::Pentasilabo,
        Self::Hexasilabo,
        Self::Heptasilabo,
        Self::Octosilabo,
        Self::Eneasilabo,
        Self::Decasilabo,
        Self::Endecasilabo,
        Self::Dodecasilabo,
        Self::Tridecasilabo,
        Self::Alejandrino,
    ];

    /// Maps a syllable count to its verse kind, if it has a canonical name.
    #[must_use]
    pub const fn from_syllables(n: usize) -> Option<Self> {
        match n {
            1..=14 => Some(Self::ALL[n - 1]),
            _ => None,
        }
    }

    #[must_use]
    pub const fn syllables(self) -> usize {
        self as usize + 1
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monosilabo => "Monosílabo",
            Self::Bisilabo => "Bisílabo",
            Self::Trisilabo => "Trisílabo",
            Self::Tetrasilabo => "Tetrasílabo",
            Self::Pentasilabo => "Pentasílabo",
            Self::Hexasilabo => "Hexasílabo",
            Self::Heptasilabo => "Heptasílabo",
            Self::Octosilabo => "Octosílabo",
            Self::Eneasilabo => "Eneasílabo",
            Self::Decasilabo => "Decasílabo",
            Self::Endecasilabo => "Endecasílabo",
            Self::Dodecasilabo => "Dodecasílabo",
            Self::Tridecasilabo => "Tridecasílabo",
            Self::Alejandrino => "Alejandrino",
        }
    }

    /// Verses of eight syllables or fewer ("arte menor").
    #[must_use]
    pub const fn is_arte_menor(self) -> bool {
        self.syllables() <= 8
    }

    /// Verses of nine syllables or more ("arte mayor").
    #[must_use]
    pub const fn is_arte_mayor(self) -> bool {
        !self.is_arte_menor()
    }
}

/// Canonical verse name for `n` syllables, or `"<n> sílabas"` when none exists.
#[must_use]
pub fn verse_name(n: usize) -> Cow<'static, str> {
    VerseKind::from_syllables(n).map_or_else(
        || Cow::Owned(format!("{n} sílabas")),
        |kind| Cow::Borrowed(kind.name()),
    )
}

/// Label shown by live metric feedback: an em dash for an empty line.
#[must_use]
pub fn metric_label(n: usize) -> Cow<'static, str> {
    if n == 0 { Cow::Borrowed("—") } else { verse_name(n) }
}
