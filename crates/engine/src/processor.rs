use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::stats::{FileReport, Source};
use chrono::Local;
use metrica_core::{PoemStructure, analyze_text};
use std::fs;
use std::path::PathBuf;

/// Bytes inspected for NUL when deciding whether a file is binary.
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Resolve the configured structure key against the catalog.
pub fn resolve_structure(config: &Config) -> Result<Option<&'static PoemStructure>> {
    config
        .structure
        .as_deref()
        .map(|key| PoemStructure::lookup(key).ok_or_else(|| EngineError::UnknownStructure(key.to_string())))
        .transpose()
}

/// Process a single file and return its report.
pub fn process_file(
    (path, meta): (PathBuf, std::fs::Metadata),
    config: &Config,
    structure: Option<&'static PoemStructure>,
) -> Result<FileReport> {
    let bytes = fs::read(&path).map_err(|e| EngineError::FileRead {
        path: path.clone(),
        source: e,
    })?;

    let mut report = FileReport::new(Source::File(path));
    report.size = meta.len();
    report.mtime = meta.modified().ok().map(chrono::DateTime::<Local>::from);

    if is_binary(&bytes) {
        report.is_binary = true;
        return Ok(report);
    }

    // Lossy conversion keeps Latin-1 leftovers from aborting the whole run
    let text = String::from_utf8_lossy(&bytes);
    fill_report(&mut report, &text, config, structure);
    Ok(report)
}

/// Process text that did not come from a file (stdin, `--text`).
#[must_use]
pub fn process_text(
    source: Source,
    text: &str,
    config: &Config,
    structure: Option<&'static PoemStructure>,
) -> FileReport {
    let mut report = FileReport::new(source);
    report.size = text.len() as u64;
    fill_report(&mut report, text, config, structure);
    report
}

fn fill_report(
    report: &mut FileReport,
    text: &str,
    config: &Config,
    structure: Option<&'static PoemStructure>,
) {
    let analysis = analyze_text(text, &config.analysis);
    report.stats = analysis.stats;
    report.lines = analysis.lines;
    report.structure = structure.map(|s| s.check(text));
}

fn is_binary(bytes: &[u8]) -> bool {
    let len = bytes.len().min(BINARY_SNIFF_LEN);
    bytes[..len].contains(&0)
}
