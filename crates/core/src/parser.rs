use alloc::string::ToString;
use alloc::vec::Vec;

use crate::config::AnalysisConfig;
use crate::stats::{LineKind, LineMetric, TextAnalysis, TextStats};
use crate::syllables::count_text;
use crate::verse::metric_label;

/// Analyze a full text: whole-text statistics plus one metric per line.
///
/// This is the entry point used by file and note processing.
#[must_use]
pub fn analyze_text(text: &str, config: &AnalysisConfig) -> TextAnalysis {
    TextAnalysis {
        stats: TextStats::from_text(text),
        lines: analyze_lines(text, config),
    }
}

/// Per-line metrics. Line numbers stay 1-based even when lines are skipped.
#[must_use]
pub fn analyze_lines(text: &str, config: &AnalysisConfig) -> Vec<LineMetric> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let line = raw.trim();
            let kind = classify(line, config);
            if kind == LineKind::Blank && config.skip_blank_lines {
                return None;
            }
            Some(metric_for(idx + 1, line, kind))
        })
        .collect()
}

/// Metric for a selection: only its first line is measured.
#[must_use]
pub fn analyze_selection(text: &str) -> LineMetric {
    let line = text.split('\n').next().unwrap_or_default().trim();
    let kind = if line.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Verse
    };
    metric_for(1, line, kind)
}

/// A trimmed line wholly wrapped in square brackets, e.g. `[ Estribillo ]`.
#[must_use]
pub fn is_section_marker(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('[') && line.ends_with(']')
}

fn classify(line: &str, config: &AnalysisConfig) -> LineKind {
    if line.is_empty() {
        LineKind::Blank
    } else if config.skip_section_markers && is_section_marker(line) {
        LineKind::Section
    } else {
        LineKind::Verse
    }
}

fn metric_for(line_no: usize, line: &str, kind: LineKind) -> LineMetric {
    let syllables = match kind {
        LineKind::Verse => count_text(line),
        LineKind::Blank | LineKind::Section => 0,
    };
    LineMetric {
        line: line_no,
        kind,
        text: line.to_string(),
        syllables,
        verse: metric_label(syllables).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SONG: &str = "[ Estrofa ]\nDe la ciudad salí\n\n[ Estribillo ]\nCanto y canto\n";

    #[test]
    fn lines_are_numbered_from_one() {
        let lines = analyze_lines("Hola\nmundo", &AnalysisConfig::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[1].line, 2);
        assert_eq!(lines[1].syllables, 2);
        assert_eq!(lines[1].verse, "Bisílabo");
    }

    #[test]
    fn blank_lines_can_be_skipped() {
        let config = AnalysisConfig {
            skip_blank_lines: true,
            ..AnalysisConfig::default()
        };
        let lines = analyze_lines("uno\n\n  \ndos", &config);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].line, 4);
    }

    #[test]
    fn blank_lines_are_dashed() {
        let lines = analyze_lines("uno\n\ndos", &AnalysisConfig::default());
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert_eq!(lines[1].verse, "—");
    }

    #[test]
    fn section_markers_are_not_verses() {
        let config = AnalysisConfig {
            skip_section_markers: true,
            skip_blank_lines: true,
        };
        let lines = analyze_lines(SONG, &config);
        let kinds: Vec<_> = lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            [LineKind::Section, LineKind::Verse, LineKind::Section, LineKind::Verse]
        );
        assert_eq!(lines[0].syllables, 0);
        assert_eq!(lines[1].syllables, 6);
    }

    #[test]
    fn section_markers_count_when_not_skipped() {
        let lines = analyze_lines("[ Estribillo ]", &AnalysisConfig::default());
        assert_eq!(lines[0].kind, LineKind::Verse);
        assert_eq!(lines[0].syllables, 4);
    }

    #[test]
    fn selection_uses_first_line_only() {
        let metric = analyze_selection("  la luna llena  \nsegunda línea");
        assert_eq!(metric.text, "la luna llena");
        assert_eq!(metric.syllables, 5);
        assert_eq!(metric.verse, "Pentasílabo");
    }

    #[test]
    fn empty_selection_has_no_label() {
        let metric = analyze_selection("   ");
        assert_eq!(metric.kind, LineKind::Blank);
        assert_eq!(metric.syllables, 0);
        assert_eq!(metric.verse, "—");
    }

    #[test]
    fn analysis_combines_stats_and_lines() {
        let analysis = analyze_text("sol\nmar", &AnalysisConfig::default());
        assert_eq!(analysis.stats.syllables, 2);
        assert_eq!(analysis.lines.len(), 2);
    }

    #[test]
    fn section_marker_shape() {
        assert!(is_section_marker("[ Puente ]"));
        assert!(is_section_marker("  [Coro]  "));
        assert!(!is_section_marker("["));
        assert!(!is_section_marker("[abierto"));
    }
}
