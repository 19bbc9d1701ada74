use crate::options::{OutputFormat, OutputMode, SortKey, WatchOutput};
use derive_builder::Builder;
use metrica_core::AnalysisConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Extensions analyzed when walking a directory.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["txt", "md", "text"];

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct WalkOptions {
    #[builder(default)]
    pub roots: Vec<PathBuf>,
    #[builder(default = "1")]
    pub threads: usize,
    #[builder(default)]
    pub hidden: bool,
    #[builder(default = "true")]
    pub git_ignore: bool,
    #[builder(default)]
    pub max_depth: Option<usize>,
    #[builder(default)]
    pub follow_links: bool,
    /// Extensions kept while walking directories. Files named directly are always read.
    #[builder(default = "default_extensions()")]
    pub allow_ext: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            roots: vec![],
            threads: 1,
            hidden: false,
            git_ignore: true,
            max_depth: None,
            follow_links: false,
            allow_ext: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Config {
    #[builder(default)]
    pub walk: WalkOptions,
    #[builder(default)]
    pub analysis: AnalysisConfig,

    /// Poem structure key to check every source against.
    #[builder(default)]
    pub structure: Option<String>,
    /// Text given on the command line, analyzed as its own source.
    #[builder(default)]
    pub inline_text: Option<String>,
    #[builder(default)]
    pub read_stdin: bool,

    #[builder(default = "OutputFormat::Table")]
    pub format: OutputFormat,
    #[builder(default)]
    pub output_mode: OutputMode,
    #[builder(default)]
    pub sort: Vec<(SortKey, bool)>,
    #[builder(default)]
    pub total_row: bool,
    #[builder(default)]
    pub output_path: Option<PathBuf>,

    #[builder(default)]
    pub strict: bool,
    #[builder(default)]
    pub watch: bool,
    #[builder(default = "Duration::from_secs(1)")]
    pub watch_interval: Duration,
    #[builder(default = "WatchOutput::Full")]
    pub watch_output: WatchOutput,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            walk: WalkOptions::default(),
            analysis: AnalysisConfig::default(),
            structure: None,
            inline_text: None,
            read_stdin: false,
            format: OutputFormat::Table,
            output_mode: OutputMode::default(),
            sort: vec![],
            total_row: false,
            output_path: None,
            strict: false,
            watch: false,
            watch_interval: Duration::from_secs(1),
            watch_output: WatchOutput::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_defaults() {
        let config = ConfigBuilder::default()
            .structure(Some("soneto".to_string()))
            .build()
            .unwrap();
        assert_eq!(config.structure.as_deref(), Some("soneto"));
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.watch_interval, Duration::from_secs(1));
        assert_eq!(config.walk.allow_ext, ["txt", "md", "text"]);
    }

    #[test]
    fn walk_builder_overrides_extensions() {
        let walk = WalkOptionsBuilder::default()
            .allow_ext(vec!["poema".to_string()])
            .threads(4usize)
            .build()
            .unwrap();
        assert_eq!(walk.allow_ext, ["poema"]);
        assert_eq!(walk.threads, 4);
        assert!(walk.git_ignore);
    }
}
