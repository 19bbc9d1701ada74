//! # metrica_core
//!
//! Spanish verse metrics without I/O.
//!
//! - [`syllables`]: syllable counting for words and free text
//! - [`verse`]: canonical verse names by syllable count
//! - [`parser`]: per-line metric analysis and text statistics
//! - [`structures`]: catalog of classical poem structures and conformance checks
//!
//! Every function here is pure and linear in the input length, so callers may
//! run it on each edit without caching.

#![no_std]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

extern crate alloc;

pub mod config;
pub mod parser;
pub mod stats;
pub mod structures;
pub mod syllables;
pub mod verse;

pub use config::AnalysisConfig;
pub use parser::{analyze_lines, analyze_selection, analyze_text};
pub use stats::{LineKind, LineMetric, TextAnalysis, TextStats};
pub use structures::{PoemStructure, StructureReport, Target, VerseCheck};
pub use syllables::{count_text, count_word, count_words};
pub use verse::{VerseKind, metric_label, verse_name};
