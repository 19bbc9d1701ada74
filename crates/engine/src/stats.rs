use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use metrica_core::{LineMetric, StructureReport, TextStats};
use serde::Serialize;

use crate::error::EngineError;

/// Where a report's text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum Source {
    File(PathBuf),
    Stdin,
    Inline,
}

impl Source {
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "<stdin>".to_string(),
            Self::Inline => "<text>".to_string(),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdin | Self::Inline => None,
        }
    }
}

/// Metrics for one analyzed source.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source: Source,
    pub name: String,
    pub size: u64,
    pub mtime: Option<DateTime<Local>>,
    pub is_binary: bool,
    pub stats: TextStats,
    pub lines: Vec<LineMetric>,
    pub structure: Option<StructureReport>,
}

impl FileReport {
    #[must_use]
    pub fn new(source: Source) -> Self {
        let name = match &source {
            Source::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            other => other.display_name(),
        };
        Self {
            source,
            name,
            size: 0,
            mtime: None,
            is_binary: false,
            stats: TextStats::default(),
            lines: Vec::new(),
            structure: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub reports: Vec<FileReport>,
    pub errors: Vec<(PathBuf, EngineError)>,
}

impl RunResult {
    /// Totals over every non-binary report.
    #[must_use]
    pub fn total(&self) -> TextStats {
        self.reports
            .iter()
            .filter(|r| !r.is_binary)
            .map(|r| r.stats)
            .sum()
    }
}
