// crates/engine/src/export.rs
use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::notes::Note;

fn markup_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

fn blank_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"))
}

/// Visible text of note content: tags become line breaks, entities are
/// decoded, and runs of blank lines collapse to one.
#[must_use]
pub fn markup_to_text(content: &str) -> String {
    let text = markup_tag().replace_all(content, "\n");
    let text = decode_entities(&text);
    blank_runs().replace_all(&text, "\n\n").into_owned()
}

fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&"),
    )
}

/// Plain-text rendering used for sharing: title, an underline as wide as the
/// title, a blank line, then the content.
#[must_use]
pub fn plain_text(note: &Note) -> String {
    let title = note.display_title();
    let content = markup_to_text(&note.content);
    let underline = "─".repeat(title.chars().count());
    format!("{title}\n{underline}\n\n{}", content.trim())
}

/// File name offered when exporting a note to disk.
#[must_use]
pub fn file_name(note: &Note) -> String {
    let stem: String = note
        .title
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    if stem.is_empty() {
        "nota.txt".to_string()
    } else {
        format!("{stem}.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteKind;
    use chrono::Utc;

    fn note(title: &str, content: &str) -> Note {
        let mut note = Note::new(NoteKind::Poem, None, Utc::now());
        note.title = title.to_string();
        note.content = content.to_string();
        note
    }

    #[test]
    fn plain_text_underlines_title() {
        let n = note("Rima", "Volverán las oscuras golondrinas");
        assert_eq!(plain_text(&n), "Rima\n────\n\nVolverán las oscuras golondrinas");
    }

    #[test]
    fn untitled_notes_use_placeholder() {
        let n = note("", "hola");
        assert_eq!(plain_text(&n), "Sin título\n──────────\n\nhola");
        assert_eq!(file_name(&n), "nota.txt");
    }

    #[test]
    fn markup_becomes_line_breaks() {
        let n = note("Canción", "<div>uno</div><div><br></div><div><br></div><div>dos&nbsp;tres</div>");
        assert_eq!(plain_text(&n), "Canción\n───────\n\nuno\n\ndos tres");
    }

    #[test]
    fn plain_content_collapses_blank_runs() {
        let n = note("T", "uno\n\n\n\ndos");
        assert_eq!(plain_text(&n), "T\n─\n\nuno\n\ndos");
        assert_eq!(markup_to_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(file_name(&note("Sol / Luna", "")), "Sol _ Luna.txt");
    }
}
