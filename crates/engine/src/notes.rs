// crates/engine/src/notes.rs
//! Note records, tag normalization, list filters and list-view labels.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Datelike, TimeZone, Utc};
use metrica_core::{AnalysisConfig, TextAnalysis, analyze_text};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::export::markup_to_text;

/// Characters kept in a list preview.
pub const PREVIEW_LEN: usize = 120;

/// Title shown for notes that were never named.
pub const UNTITLED: &str = "Sin título";

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Poem,
    Song,
}

impl NoteKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Poem => "Poesía",
            Self::Song => "Canción",
        }
    }
}

/// A poem or song with its tags and timestamps.
///
/// Field names serialize in camelCase with epoch-millisecond timestamps, so a
/// notes array exported from the browser app loads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// A fresh, empty note. Songs never carry a structure.
    #[must_use]
    pub fn new(kind: NoteKind, structure: Option<String>, now: DateTime<Utc>) -> Self {
        let structure = match kind {
            NoteKind::Poem => structure.filter(|s| !s.trim().is_empty()),
            NoteKind::Song => None,
        };
        Self {
            id: generate_id(now),
            kind,
            structure,
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() { UNTITLED } else { &self.title }
    }

    /// Add a tag after normalizing it. Returns `false` for empty or repeated tags.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        match normalize_tag(raw) {
            Some(tag) if !self.tags.contains(&tag) => {
                self.tags.push(tag);
                true
            }
            _ => false,
        }
    }

    pub fn remove_tag(&mut self, raw: &str) -> bool {
        let Some(tag) = normalize_tag(raw) else {
            return false;
        };
        let before = self.tags.len();
        self.tags.retain(|t| *t != tag);
        self.tags.len() != before
    }

    /// Remove the tag when present, add it otherwise. Returns whether it is now set.
    pub fn toggle_tag(&mut self, raw: &str) -> bool {
        if self.remove_tag(raw) {
            false
        } else {
            self.add_tag(raw)
        }
    }

    /// Content with markup and `[...]` section markers stripped, cut to [`PREVIEW_LEN`] chars.
    #[must_use]
    pub fn preview(&self) -> String {
        static MARKUP: OnceLock<Regex> = OnceLock::new();
        static SECTION: OnceLock<Regex> = OnceLock::new();
        let markup = MARKUP.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"));
        let section = SECTION.get_or_init(|| Regex::new(r"\[.*?\]").expect("valid regex"));

        let text = markup.replace_all(&self.content, "");
        let text = section.replace_all(&text, "");
        text.trim().chars().take(PREVIEW_LEN).collect()
    }

    /// Per-line metric analysis of the note's visible text. Plain content is
    /// analyzed as written so line numbers match the editor.
    #[must_use]
    pub fn analysis(&self, config: &AnalysisConfig) -> TextAnalysis {
        if self.content.contains(['<', '&']) {
            analyze_text(&markup_to_text(&self.content), config)
        } else {
            analyze_text(&self.content, config)
        }
    }

    #[must_use]
    pub fn has_all_tags(&self, tags: &[String]) -> bool {
        tags.iter().all(|t| self.tags.contains(t))
    }
}

/// Normalize a user-entered tag: trimmed, lowercased, inner whitespace as `-`.
///
/// Returns `None` when nothing is left.
#[must_use]
pub fn normalize_tag(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let tag = lowered.split_whitespace().collect::<Vec<_>>().join("-");
    (!tag.is_empty()).then_some(tag)
}

/// Base36 millisecond timestamp followed by a base36 suffix.
#[must_use]
pub fn generate_id(now: DateTime<Utc>) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = u64::from(now.timestamp_subsec_nanos());
    // splitmix64 finalizer over nanos, pid and sequence
    let mut x = nanos ^ (u64::from(std::process::id()) << 32) ^ seq.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;

    let mut id = to_base36(millis);
    id.push_str(&to_base36(x));
    id
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

/// Short age label used in note lists.
#[must_use]
pub fn relative_date<Tz: TimeZone>(ts: &DateTime<Tz>, now: &DateTime<Tz>) -> String {
    let secs = now.clone().signed_duration_since(ts.clone()).num_seconds();
    match secs {
        s if s < 60 => "Ahora".to_string(),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s if s < 604_800 => format!("{}d", s / 86_400),
        _ => format!("{} {}", ts.day(), MONTHS_ES[ts.month0() as usize]),
    }
}

/// List filter. Every set criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub kind: Option<NoteKind>,
    pub favorites_only: bool,
    /// Normalized tags the note must all carry.
    pub tags: Vec<String>,
    /// Case-insensitive substring of title or content.
    pub search: Option<String>,
}

impl NoteFilter {
    #[must_use]
    pub fn matches(&self, note: &Note) -> bool {
        if self.kind.is_some_and(|k| k != note.kind) {
            return false;
        }
        if self.favorites_only && !note.favorite {
            return false;
        }
        if !note.has_all_tags(&self.tags) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn tags_are_normalized() {
        assert_eq!(normalize_tag("  Amor Eterno ").as_deref(), Some("amor-eterno"));
        assert_eq!(normalize_tag("MAR\t y  \n tierra").as_deref(), Some("mar-y-tierra"));
        assert_eq!(normalize_tag("   "), None);
    }

    #[test]
    fn tags_are_unique_and_toggle() {
        let mut note = Note::new(NoteKind::Song, None, at(0));
        assert!(note.add_tag("Verano"));
        assert!(!note.add_tag("verano "));
        assert!(!note.add_tag(""));
        assert_eq!(note.tags, ["verano"]);

        assert!(note.toggle_tag("Noche"));
        assert_eq!(note.tags, ["verano", "noche"]);
        assert!(!note.toggle_tag("verano"));
        assert_eq!(note.tags, ["noche"]);
    }

    #[test]
    fn songs_drop_structure() {
        let song = Note::new(NoteKind::Song, Some("soneto".to_string()), at(1));
        assert_eq!(song.structure, None);
        let poem = Note::new(NoteKind::Poem, Some("soneto".to_string()), at(1));
        assert_eq!(poem.structure.as_deref(), Some("soneto"));
        assert_eq!(poem.display_title(), UNTITLED);
    }

    #[test]
    fn kind_labels_match_list_badges() {
        assert_eq!(NoteKind::Poem.label(), "Poesía");
        assert_eq!(NoteKind::Song.label(), "Canción");
    }

    #[test]
    fn ids_start_with_base36_millis_and_differ() {
        let now = at(1_700_000_000_000);
        let a = generate_id(now);
        let b = generate_id(now);
        assert!(a.starts_with(&to_base36(1_700_000_000_000)));
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn preview_strips_markup_and_sections() {
        let mut note = Note::new(NoteKind::Song, None, at(0));
        note.content = "[Verso 1]\n<b>Sube</b> la marea".to_string();
        assert_eq!(note.preview(), "Sube la marea");

        note.content = "a".repeat(200);
        assert_eq!(note.preview().chars().count(), PREVIEW_LEN);
    }

    #[test]
    fn relative_labels() {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        assert_eq!(relative_date(&(now - Duration::seconds(59)), &now), "Ahora");
        assert_eq!(relative_date(&(now - Duration::minutes(5)), &now), "5m");
        assert_eq!(relative_date(&(now - Duration::hours(3)), &now), "3h");
        assert_eq!(relative_date(&(now - Duration::days(6)), &now), "6d");
        let old = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(relative_date(&old, &now), "5 ene");
    }

    #[test]
    fn filter_combines_criteria() {
        let mut poem = Note::new(NoteKind::Poem, None, at(0));
        poem.title = "Oda al Mar".to_string();
        poem.favorite = true;
        poem.add_tag("mar");
        poem.add_tag("azul");

        let song = Note::new(NoteKind::Song, None, at(0));

        let filter = NoteFilter {
            kind: Some(NoteKind::Poem),
            favorites_only: true,
            tags: vec!["mar".to_string(), "azul".to_string()],
            search: Some("MAR".to_string()),
        };
        assert!(filter.matches(&poem));
        assert!(!filter.matches(&song));

        let missing_tag = NoteFilter {
            tags: vec!["mar".to_string(), "sol".to_string()],
            ..NoteFilter::default()
        };
        assert!(!missing_tag.matches(&poem));
        assert!(NoteFilter::default().matches(&song));
    }

    #[test]
    fn serializes_like_the_browser_store() {
        let mut note = Note::new(NoteKind::Poem, Some("haiku".to_string()), at(1_000));
        note.id = "abc".to_string();
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["type"], "poem");
        assert_eq!(json["createdAt"], 1_000);
        assert_eq!(json["updatedAt"], 1_000);

        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back, note);
    }
}
