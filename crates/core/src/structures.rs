//! Classical poem structures and verse-by-verse conformance.
//!
//! The catalog is static presentation data; checking a text against it reuses
//! the syllable engine but never feeds back into it.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use serde::Serialize;

use crate::parser::is_section_marker;
use crate::syllables::count_text;

/// A stanza of a structure. `verses == 0` marks a free-length structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stanza {
    pub label: &'static str,
    pub verses: usize,
    pub hint: &'static str,
    /// Target syllables for each verse of the stanza.
    pub targets: &'static [usize],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoemStructure {
    pub key: &'static str,
    pub name: &'static str,
    pub stanzas: &'static [Stanza],
    /// Lengths accepted for any verse of a free-length structure. Empty means no constraint.
    pub free_lengths: &'static [usize],
}

/// Syllable target for one verse position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Target {
    Exact(usize),
    OneOf(&'static [usize]),
    Any,
    /// The verse lies beyond the structure's fixed length.
    Extra,
}

impl Target {
    #[must_use]
    pub fn accepts(self, syllables: usize) -> bool {
        match self {
            Self::Exact(n) => syllables == n,
            Self::OneOf(lengths) => lengths.contains(&syllables),
            Self::Any => true,
            Self::Extra => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseCheck {
    /// 1-based line number in the checked text.
    pub line: usize,
    pub syllables: usize,
    pub expected: Target,
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureReport {
    pub structure: &'static str,
    pub expected_verses: Option<usize>,
    pub found_verses: usize,
    pub verses: Vec<VerseCheck>,
}

impl StructureReport {
    /// All verses on target and, for fixed structures, the right verse count.
    #[must_use]
    pub fn is_conforming(&self) -> bool {
        self.verses.iter().all(|v| v.ok)
            && self
                .expected_verses
                .is_none_or(|expected| expected == self.found_verses)
    }

    #[must_use]
    pub fn mismatches(&self) -> usize {
        self.verses.iter().filter(|v| !v.ok).count()
    }
}

const ELEVEN: [usize; 4] = [11; 4];

pub static CATALOG: [PoemStructure; 6] = [
    PoemStructure {
        key: "soneto",
        name: "Soneto",
        stanzas: &[
            Stanza {
                label: "1.er Cuarteto",
                verses: 4,
                hint: "ABBA · 11 sílabas",
                targets: &ELEVEN,
            },
            Stanza {
                label: "2.º Cuarteto",
                verses: 4,
                hint: "ABBA · 11 sílabas",
                targets: &ELEVEN,
            },
            Stanza {
                label: "1.er Terceto",
                verses: 3,
                hint: "CDC · libre",
                targets: &[11, 11, 11],
            },
            Stanza {
                label: "2.º Terceto",
                verses: 3,
                hint: "DCD · libre",
                targets: &[11, 11, 11],
            },
        ],
        free_lengths: &[],
    },
    PoemStructure {
        key: "cuarteto",
        name: "Cuarteto",
        stanzas: &[Stanza {
            label: "Cuarteto",
            verses: 4,
            hint: "ABBA · versos endecasílabos",
            targets: &ELEVEN,
        }],
        free_lengths: &[],
    },
    PoemStructure {
        key: "lira",
        name: "Lira",
        stanzas: &[Stanza {
            label: "Lira",
            verses: 5,
            hint: "7-11-7-7-11 sílabas · rima aBabB",
            targets: &[7, 11, 7, 7, 11],
        }],
        free_lengths: &[],
    },
    PoemStructure {
        key: "haiku",
        name: "Haiku",
        stanzas: &[Stanza {
            label: "Haiku",
            verses: 3,
            hint: "5 síl. · 7 síl. · 5 síl.",
            targets: &[5, 7, 5],
        }],
        free_lengths: &[],
    },
    PoemStructure {
        key: "silva",
        name: "Silva",
        stanzas: &[Stanza {
            label: "Silva",
            verses: 0,
            hint: "Heptasílabos y endecasílabos libres",
            targets: &[],
        }],
        free_lengths: &[7, 11],
    },
    PoemStructure {
        key: "libre",
        name: "Verso libre",
        stanzas: &[Stanza {
            label: "",
            verses: 0,
            hint: "Sin estructura fija · tu ritmo, tus reglas.",
            targets: &[],
        }],
        free_lengths: &[],
    },
];

impl PoemStructure {
    /// Finds a structure by key, ignoring ASCII case.
    #[must_use]
    pub fn lookup(key: &str) -> Option<&'static Self> {
        CATALOG.iter().find(|s| s.key.eq_ignore_ascii_case(key.trim()))
    }

    #[must_use]
    pub fn all() -> &'static [Self] {
        &CATALOG
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.stanzas.first().is_none_or(|s| s.verses == 0)
    }

    /// Total verse count, or `None` for free-length structures.
    #[must_use]
    pub fn expected_verses(&self) -> Option<usize> {
        if self.is_free() {
            None
        } else {
            Some(self.stanzas.iter().map(|s| s.verses).sum())
        }
    }

    /// Target for the verse at `index` (0-based, counting verses only).
    #[must_use]
    pub fn target_for(&self, index: usize) -> Target {
        if self.is_free() {
            return if self.free_lengths.is_empty() {
                Target::Any
            } else {
                Target::OneOf(self.free_lengths)
            };
        }
        self.stanzas
            .iter()
            .flat_map(|s| s.targets.iter().copied())
            .nth(index)
            .map_or(Target::Extra, Target::Exact)
    }

    /// Checks every non-blank, non-marker line of `text` against the targets.
    #[must_use]
    pub fn check(&self, text: &str) -> StructureReport {
        let verses: Vec<VerseCheck> = text
            .lines()
            .enumerate()
            .map(|(idx, raw)| (idx + 1, raw.trim()))
            .filter(|(_, line)| !line.is_empty() && !is_section_marker(line))
            .enumerate()
            .map(|(verse_idx, (line_no, line))| {
                let syllables = count_text(line);
                let expected = self.target_for(verse_idx);
                VerseCheck {
                    line: line_no,
                    syllables,
                    expected,
                    ok: expected.accepts(syllables),
                }
            })
            .collect();

        StructureReport {
            structure: self.key,
            expected_verses: self.expected_verses(),
            found_verses: verses.len(),
            verses,
        }
    }

    /// Guidance text shown above the editor.
    #[must_use]
    pub fn guide(&self) -> String {
        if self.is_free() {
            let hint = self.stanzas.first().map_or("", |s| s.hint);
            return format!("{}: {hint}", self.name);
        }
        let mut out = String::new();
        for (i, stanza) in self.stanzas.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{} ({} versos)\n  {}", stanza.label, stanza.verses, stanza.hint);
        }
        out
    }
}
