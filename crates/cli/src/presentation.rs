// crates/cli/src/presentation.rs
use crate::config::Config;
use crate::error::Result;
use comfy_table::{CellAlignment, Table, presets};
use metrica_core::{LineKind, LineMetric, StructureReport, Target, TextStats, VerseCheck};
use metrica_engine::options::{OutputFormat, OutputMode, SortKey, WatchOutput};
use metrica_engine::stats::{FileReport, RunResult};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Write;
use std::path::Path;

pub fn clear_screen(output: WatchOutput) {
    if matches!(output, WatchOutput::Full) {
        print!("\x1B[2J\x1B[1;1H");
    }
}

/// Render a run in the configured format.
///
/// # Errors
/// Returns an error if JSON or YAML serialization fails.
pub fn render(result: &RunResult, config: &Config) -> Result<String> {
    let reports = visible_reports(result, config);
    let total = result.total();

    let format = if config.watch && config.watch_output == WatchOutput::Jsonl {
        OutputFormat::Jsonl
    } else {
        config.format
    };

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&document(&reports, total, config))? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&document(&reports, total, config))?),
        OutputFormat::Jsonl => render_jsonl(&reports, total, config),
        OutputFormat::Md => Ok(render_markdown(&reports, total, config)),
        OutputFormat::Csv => Ok(render_sv(&reports, total, config, ',')),
        OutputFormat::Tsv => Ok(render_sv(&reports, total, config, '\t')),
        OutputFormat::Table => Ok(render_table(&reports, total, config)),
    }
}

fn visible_reports<'a>(result: &'a RunResult, config: &Config) -> Vec<&'a FileReport> {
    let mut reports: Vec<_> = result.reports.iter().filter(|r| !r.is_binary).collect();
    if !config.sort.is_empty() {
        reports.sort_by(|a, b| {
            for (key, desc) in &config.sort {
                let order = match key {
                    SortKey::Syllables => a.stats.syllables.cmp(&b.stats.syllables),
                    SortKey::Words => a.stats.words.cmp(&b.stats.words),
                    SortKey::Lines => a.stats.lines.cmp(&b.stats.lines),
                    SortKey::Chars => a.stats.chars.cmp(&b.stats.chars),
                    SortKey::Name => a.name.cmp(&b.name),
                };
                if order != Ordering::Equal {
                    return if *desc { order.reverse() } else { order };
                }
            }
            Ordering::Equal
        });
    }
    reports
}

#[derive(Serialize)]
struct Document<'a> {
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<SourceView<'a>>>,
    total: TextStats,
}

#[derive(Serialize)]
struct SourceView<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a Path>,
    #[serde(flatten)]
    stats: TextStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<&'a [LineMetric]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    structure: Option<StructureView<'a>>,
}

#[derive(Serialize)]
struct StructureView<'a> {
    conforming: bool,
    #[serde(flatten)]
    report: &'a StructureReport,
}

fn source_view<'a>(report: &'a FileReport, config: &Config) -> SourceView<'a> {
    SourceView {
        name: &report.name,
        path: report.source.path(),
        stats: report.stats,
        lines: (config.output_mode == OutputMode::Lines).then_some(report.lines.as_slice()),
        structure: report.structure.as_ref().map(|s| StructureView {
            conforming: s.is_conforming(),
            report: s,
        }),
    }
}

fn document<'a>(reports: &[&'a FileReport], total: TextStats, config: &Config) -> Document<'a> {
    let sources = (config.output_mode != OutputMode::TotalOnly)
        .then(|| reports.iter().map(|&r| source_view(r, config)).collect());
    Document {
        version: crate::VERSION,
        sources,
        total,
    }
}

fn render_jsonl(reports: &[&FileReport], total: TextStats, config: &Config) -> Result<String> {
    let mut out = String::new();
    if config.output_mode != OutputMode::TotalOnly {
        for report in reports {
            let mut value = serde_json::to_value(source_view(report, config))?;
            if let Some(obj) = value.as_object_mut() {
                obj.insert("type".to_string(), "source".into());
            }
            out.push_str(&serde_json::to_string(&value)?);
            out.push('\n');
        }
    }
    let total_obj = serde_json::json!({
        "type": "total",
        "version": crate::VERSION,
        "sources": reports.len(),
        "lines": total.lines,
        "words": total.words,
        "syllables": total.syllables,
        "chars": total.chars,
    });
    out.push_str(&total_obj.to_string());
    out.push('\n');
    Ok(out)
}

fn target_label(target: Target) -> String {
    match target {
        Target::Exact(n) => n.to_string(),
        Target::OneOf(lengths) => lengths
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/"),
        Target::Any => "*".to_string(),
        Target::Extra => "extra".to_string(),
    }
}

fn check_for(report: &FileReport, line: usize) -> Option<&VerseCheck> {
    report
        .structure
        .as_ref()
        .and_then(|s| s.verses.iter().find(|v| v.line == line))
}

fn structure_summary(report: &StructureReport) -> String {
    let verses = match report.expected_verses {
        Some(expected) => format!("{}/{expected} verses", report.found_verses),
        None => format!("{} verses", report.found_verses),
    };
    let verdict = if report.is_conforming() {
        "conforming".to_string()
    } else {
        format!("{} off target", report.mismatches())
    };
    format!("{}: {verses}, {verdict}", report.structure)
}

fn render_table(reports: &[&FileReport], total: TextStats, config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "metrica v{} · parallel={}", crate::VERSION, config.walk.threads);
    out.push('\n');

    match config.output_mode {
        OutputMode::Lines => {
            for report in reports {
                let _ = writeln!(out, "== {} ==", report.source.display_name());
                out.push_str(&lines_table(report).to_string());
                out.push('\n');
                if let Some(structure) = &report.structure {
                    let _ = writeln!(out, "{}", structure_summary(structure));
                }
                out.push('\n');
            }
        }
        OutputMode::Summary | OutputMode::TotalOnly => {
            let with_structure = reports.iter().any(|r| r.structure.is_some());
            let mut table = Table::new();
            table.load_preset(presets::UTF8_HORIZONTAL_ONLY);
            let mut header = vec!["LINES", "WORDS", "SYLLABLES", "CHARS", "SOURCE"];
            if with_structure {
                header.push("STRUCTURE");
            }
            table.set_header(header);
            if config.output_mode == OutputMode::Summary {
                for report in reports {
                    let mut row = stats_row(report.stats);
                    row.push(report.source.display_name());
                    if with_structure {
                        row.push(report.structure.as_ref().map(structure_summary).unwrap_or_default());
                    }
                    table.add_row(row);
                }
            }
            let mut row = stats_row(total);
            row.push(format!("TOTAL ({} sources)", reports.len()));
            table.add_row(row);
            for col in 0..4 {
                if let Some(column) = table.column_mut(col) {
                    column.set_cell_alignment(CellAlignment::Right);
                }
            }
            out.push_str(&table.to_string());
            out.push('\n');
        }
    }

    out.push('\n');
    let _ = writeln!(out, "[metrica] Completed: {} source(s) analyzed.", reports.len());
    out
}

fn stats_row(stats: TextStats) -> Vec<String> {
    vec![
        stats.lines.to_string(),
        stats.words.to_string(),
        stats.syllables.to_string(),
        stats.chars.to_string(),
    ]
}

fn lines_table(report: &FileReport) -> Table {
    let with_structure = report.structure.is_some();
    let mut table = Table::new();
    table.load_preset(presets::UTF8_HORIZONTAL_ONLY);
    let mut header = vec!["#", "SYL", "VERSE", "TEXT"];
    if with_structure {
        header.push("TARGET");
    }
    table.set_header(header);

    for metric in &report.lines {
        let (syllables, verse) = match metric.kind {
            LineKind::Verse => (metric.syllables.to_string(), metric.verse.clone()),
            LineKind::Blank => (String::new(), String::new()),
            LineKind::Section => (String::new(), "sección".to_string()),
        };
        let mut row = vec![metric.line.to_string(), syllables, verse, metric.text.clone()];
        if with_structure {
            row.push(check_for(report, metric.line).map_or_else(String::new, |check| {
                let mark = if check.ok { "✓" } else { "✗" };
                format!("{mark} {}", target_label(check.expected))
            }));
        }
        table.add_row(row);
    }
    for col in 0..2 {
        if let Some(column) = table.column_mut(col) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn escape_md(text: &str) -> String {
    text.replace('|', "\\|")
}

fn render_markdown(reports: &[&FileReport], total: TextStats, config: &Config) -> String {
    let mut out = String::new();
    match config.output_mode {
        OutputMode::Lines => {
            for report in reports {
                let _ = writeln!(out, "### {}", escape_md(&report.source.display_name()));
                out.push('\n');
                out.push_str("| # | Syllables | Verse | Text |\n");
                out.push_str("|---:|---:|:---|:---|\n");
                for m in &report.lines {
                    let _ = writeln!(
                        out,
                        "| {} | {} | {} | {} |",
                        m.line,
                        m.syllables,
                        escape_md(&m.verse),
                        escape_md(&m.text)
                    );
                }
                if let Some(structure) = &report.structure {
                    out.push('\n');
                    let _ = writeln!(out, "_{}_", structure_summary(structure));
                }
                out.push('\n');
            }
        }
        OutputMode::Summary | OutputMode::TotalOnly => {
            out.push_str("### Verse Statistics\n\n");
            out.push_str("| Lines | Words | Syllables | Chars | Source |\n");
            out.push_str("|---:|---:|---:|---:|:---|\n");
            if config.output_mode == OutputMode::Summary {
                for report in reports {
                    let s = report.stats;
                    let _ = writeln!(
                        out,
                        "| {} | {} | {} | {} | {} |",
                        s.lines,
                        s.words,
                        s.syllables,
                        s.chars,
                        escape_md(&report.source.display_name())
                    );
                }
            }
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | **TOTAL** |",
                total.lines, total.words, total.syllables, total.chars
            );
        }
    }
    out
}

fn sv_field(value: &str, delimiter: char) -> String {
    if delimiter == ',' && value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else if delimiter == '\t' {
        value.replace(['\t', '\n'], " ")
    } else {
        value.to_string()
    }
}

fn render_sv(reports: &[&FileReport], total: TextStats, config: &Config, delimiter: char) -> String {
    let d = delimiter;
    let mut out = String::new();

    if config.output_mode == OutputMode::Lines {
        let _ = writeln!(out, "source{d}line{d}kind{d}syllables{d}verse{d}text");
        for report in reports {
            let source = sv_field(&report.source.display_name(), d);
            for m in &report.lines {
                let kind = match m.kind {
                    LineKind::Verse => "verse",
                    LineKind::Blank => "blank",
                    LineKind::Section => "section",
                };
                let _ = writeln!(
                    out,
                    "{source}{d}{}{d}{kind}{d}{}{d}{}{d}{}",
                    m.line,
                    m.syllables,
                    sv_field(&m.verse, d),
                    sv_field(&m.text, d)
                );
            }
        }
        return out;
    }

    let _ = writeln!(out, "lines{d}words{d}syllables{d}chars{d}source");
    if config.output_mode == OutputMode::Summary {
        for report in reports {
            let s = report.stats;
            let _ = writeln!(
                out,
                "{}{d}{}{d}{}{d}{}{d}{}",
                s.lines,
                s.words,
                s.syllables,
                s.chars,
                sv_field(&report.source.display_name(), d)
            );
        }
    }
    if config.total_row || config.output_mode == OutputMode::TotalOnly {
        let _ = writeln!(
            out,
            "{}{d}{}{d}{}{d}{}{d}TOTAL",
            total.lines, total.words, total.syllables, total.chars
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrica_engine::processor::process_text;
    use metrica_engine::stats::Source;

    fn run_inline(text: &str, config: &Config) -> RunResult {
        let structure = metrica_engine::processor::resolve_structure(config).unwrap();
        RunResult {
            reports: vec![process_text(Source::Inline, text, config, structure)],
            errors: Vec::new(),
        }
    }

    #[test]
    fn csv_summary_with_total_row() {
        let config = Config {
            format: OutputFormat::Csv,
            total_row: true,
            ..Config::default()
        };
        let out = render(&run_inline("Hola, mundo", &config), &config).unwrap();
        assert_eq!(out, "lines,words,syllables,chars,source\n1,2,4,11,<text>\n1,2,4,11,TOTAL\n");
    }

    #[test]
    fn csv_lines_quotes_commas() {
        let config = Config {
            format: OutputFormat::Csv,
            output_mode: OutputMode::Lines,
            ..Config::default()
        };
        let out = render(&run_inline("Hola, mundo", &config), &config).unwrap();
        assert_eq!(
            out,
            "source,line,kind,syllables,verse,text\n<text>,1,verse,4,Tetrasílabo,\"Hola, mundo\"\n"
        );
    }

    #[test]
    fn json_total_only_omits_sources() {
        let config = Config {
            format: OutputFormat::Json,
            output_mode: OutputMode::TotalOnly,
            ..Config::default()
        };
        let out = render(&run_inline("luna", &config), &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value.get("sources").is_none());
        assert_eq!(value["total"]["syllables"], 2);
    }

    #[test]
    fn json_reports_structure_conformance() {
        let config = Config {
            format: OutputFormat::Json,
            structure: Some("haiku".to_string()),
            ..Config::default()
        };
        let text = "sol de la tarde\nla luz cae en el mar\nsilencio azul";
        let out = render(&run_inline(text, &config), &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let structure = &value["sources"][0]["structure"];
        assert_eq!(structure["conforming"], true);
        assert_eq!(structure["structure"], "haiku");
        assert_eq!(structure["found_verses"], 3);
    }

    #[test]
    fn table_marks_verses_against_targets() {
        let config = Config {
            output_mode: OutputMode::Lines,
            structure: Some("haiku".to_string()),
            ..Config::default()
        };
        let out = render(&run_inline("sol de la tarde\nhola", &config), &config).unwrap();
        assert!(out.contains("✓ 5"));
        assert!(out.contains("✗ 7"));
        assert!(out.contains("haiku: 2/3 verses, 1 off target"));
    }

    #[test]
    fn sort_orders_by_key_then_direction() {
        let config = Config {
            format: OutputFormat::Tsv,
            sort: vec![(SortKey::Syllables, true)],
            ..Config::default()
        };
        let mut result = run_inline("sol", &config);
        result
            .reports
            .extend(run_inline("mariposa", &config).reports);
        let out = render(&result, &config).unwrap();
        let syllables: Vec<_> = out
            .lines()
            .skip(1)
            .map(|l| l.split('\t').nth(2).unwrap().to_string())
            .collect();
        assert_eq!(syllables, ["4", "1"]);
    }

    #[test]
    fn markdown_escapes_pipes() {
        let config = Config {
            format: OutputFormat::Md,
            output_mode: OutputMode::Lines,
            ..Config::default()
        };
        let out = render(&run_inline("a | b", &config), &config).unwrap();
        assert!(out.contains("a \\| b"));
    }
}
