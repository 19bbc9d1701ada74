// crates/cli/src/config.rs
use crate::args::AnalyzeArgs;
use crate::error::{AppError, Result};
use crate::options::{self, OutputMode};
use metrica_core::AnalysisConfig;
pub use metrica_engine::config::{Config, ConfigBuilder, WalkOptions, WalkOptionsBuilder};
use metrica_engine::options as engine_options;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Defaults read from `--config FILE`. Command-line flags win over them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileDefaults {
    pub format: Option<options::OutputFormat>,
    pub structure: Option<String>,
    pub skip_sections: Option<bool>,
    pub ext: Option<Vec<String>>,
    pub store: Option<PathBuf>,
}

impl FileDefaults {
    /// Load defaults from a `.json` file, or YAML for any other extension.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| AppError::ConfigFile {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// Build the engine configuration from `analyze` arguments and file defaults.
///
/// # Errors
/// Returns an error if the builders reject the assembled values.
pub fn analyze_config(args: AnalyzeArgs, defaults: &FileDefaults) -> Result<Config> {
    let walk = walk_options_from_args(&args, defaults)?;

    let read_stdin = args.paths.iter().any(|p| p.as_os_str() == "-")
        || (args.paths.is_empty() && args.metric.text.is_none());

    let analysis = AnalysisConfig {
        skip_blank_lines: args.metric.skip_blank,
        skip_section_markers: args.metric.skip_sections || defaults.skip_sections.unwrap_or(false),
    };

    let format: engine_options::OutputFormat = args
        .output
        .format
        .or(defaults.format)
        .unwrap_or(options::OutputFormat::Table)
        .into();
    let mode = if args.output.lines {
        OutputMode::Lines
    } else {
        args.output.output_mode
    };
    let output_mode: engine_options::OutputMode = mode.into();
    let watch_output: engine_options::WatchOutput = args.behavior.watch_output.into();
    let sort: Vec<_> = args
        .output
        .sort
        .unwrap_or_default()
        .0
        .into_iter()
        .map(|(k, d)| (engine_options::SortKey::from(k), d))
        .collect();

    ConfigBuilder::default()
        .walk(walk)
        .analysis(analysis)
        .structure(args.metric.structure.or_else(|| defaults.structure.clone()))
        .inline_text(args.metric.text)
        .read_stdin(read_stdin)
        .format(format)
        .output_mode(output_mode)
        .sort(sort)
        .total_row(args.output.total_row)
        .output_path(args.output.output)
        .strict(args.behavior.strict)
        .watch(args.behavior.watch)
        .watch_interval(Duration::from_secs(args.behavior.watch_interval.unwrap_or(1)))
        .watch_output(watch_output)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

impl TryFrom<AnalyzeArgs> for Config {
    type Error = AppError;

    fn try_from(args: AnalyzeArgs) -> Result<Self> {
        analyze_config(args, &FileDefaults::default())
    }
}

fn walk_options_from_args(args: &AnalyzeArgs, defaults: &FileDefaults) -> Result<WalkOptions> {
    let scan = &args.scan;
    let roots: Vec<PathBuf> = args
        .paths
        .iter()
        .filter(|p| p.as_os_str() != "-")
        .cloned()
        .collect();

    let mut builder = WalkOptionsBuilder::default();
    builder
        .roots(roots)
        .threads(scan.jobs.unwrap_or_else(num_cpus::get))
        .hidden(scan.hidden)
        .git_ignore(!scan.no_gitignore)
        .max_depth(scan.max_depth)
        .follow_links(scan.follow);

    let ext = if scan.ext.is_empty() {
        defaults.ext.clone()
    } else {
        Some(scan.ext.clone())
    };
    if let Some(ext) = ext {
        builder.allow_ext(
            ext.into_iter()
                .map(|e| e.trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect::<Vec<_>>(),
        );
    }

    builder.build().map_err(|e| AppError::Config(e.to_string()))
}

/// Store path: `--store`, then `$METRICA_STORE`, then the config file, then
/// `~/.metrica/notes.json`.
#[must_use]
pub fn store_path(flag: Option<PathBuf>, defaults: &FileDefaults) -> PathBuf {
    flag.or_else(|| std::env::var_os("METRICA_STORE").map(PathBuf::from))
        .or_else(|| defaults.store.clone())
        .unwrap_or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".metrica")
                .join("notes.json")
        })
}

// CLI -> engine enum conversion

macro_rules! map_enum {
    ($from:ty, $to:ty, $($variant:ident),+ $(,)?) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self {
                match f {
                    $( <$from>::$variant => <$to>::$variant, )+
                }
            }
        }
    };
}

map_enum!(
    options::OutputFormat,
    engine_options::OutputFormat,
    Table,
    Csv,
    Tsv,
    Json,
    Yaml,
    Md,
    Jsonl
);
map_enum!(
    options::OutputMode,
    engine_options::OutputMode,
    Summary,
    Lines,
    TotalOnly
);
map_enum!(options::WatchOutput, engine_options::WatchOutput, Full, Jsonl);
map_enum!(
    options::SortKey,
    engine_options::SortKey,
    Syllables,
    Words,
    Lines,
    Chars,
    Name
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{Cli, Command};
    use clap::Parser;

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        let cli = Cli::try_parse_from(std::iter::once("metrica").chain(std::iter::once("analyze")).chain(argv.iter().copied()))
            .unwrap();
        match cli.command {
            Command::Analyze(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn no_input_means_stdin() {
        let config = Config::try_from(analyze_args(&[])).unwrap();
        assert!(config.read_stdin);
        assert!(config.walk.roots.is_empty());
    }

    #[test]
    fn text_flag_replaces_stdin() {
        let config = Config::try_from(analyze_args(&["--text", "hola", "--lines"])).unwrap();
        assert!(!config.read_stdin);
        assert_eq!(config.inline_text.as_deref(), Some("hola"));
        assert_eq!(config.output_mode, engine_options::OutputMode::Lines);
    }

    #[test]
    fn dash_reads_stdin_next_to_paths() {
        let config = Config::try_from(analyze_args(&["poemas", "-", "--ext", ".lrc,txt", "-j", "2"])).unwrap();
        assert!(config.read_stdin);
        assert_eq!(config.walk.roots, [PathBuf::from("poemas")]);
        assert_eq!(config.walk.allow_ext, ["lrc", "txt"]);
        assert_eq!(config.walk.threads, 2);
    }

    #[test]
    fn file_defaults_fill_unset_flags() {
        let defaults = FileDefaults {
            format: Some(options::OutputFormat::Json),
            structure: Some("soneto".to_string()),
            skip_sections: Some(true),
            ext: Some(vec!["poema".to_string()]),
            store: None,
        };
        let config = analyze_config(analyze_args(&["-t", "x"]), &defaults).unwrap();
        assert_eq!(config.format, engine_options::OutputFormat::Json);
        assert_eq!(config.structure.as_deref(), Some("soneto"));
        assert!(config.analysis.skip_section_markers);
        assert_eq!(config.walk.allow_ext, ["poema"]);

        let config = analyze_config(analyze_args(&["-t", "x", "-f", "csv", "-s", "haiku"]), &defaults).unwrap();
        assert_eq!(config.format, engine_options::OutputFormat::Csv);
        assert_eq!(config.structure.as_deref(), Some("haiku"));
    }

    #[test]
    fn defaults_parse_from_yaml_and_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let yaml = dir.path().join("metrica.yaml");
        std::fs::write(&yaml, "format: md\nstructure: lira\next: [txt]\n").unwrap();
        let loaded = FileDefaults::load(&yaml).unwrap();
        assert_eq!(loaded.format, Some(options::OutputFormat::Md));
        assert_eq!(loaded.structure.as_deref(), Some("lira"));

        let json = dir.path().join("metrica.json");
        std::fs::write(&json, r#"{"store": "notas.json", "skip_sections": true}"#).unwrap();
        let loaded = FileDefaults::load(&json).unwrap();
        assert_eq!(loaded.store, Some(PathBuf::from("notas.json")));
        assert_eq!(loaded.skip_sections, Some(true));

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "colour: blue\n").unwrap();
        assert!(matches!(FileDefaults::load(&bad), Err(AppError::ConfigFile { .. })));
    }

    #[test]
    fn explicit_store_flag_wins() {
        let defaults = FileDefaults {
            store: Some(PathBuf::from("from-config.json")),
            ..FileDefaults::default()
        };
        assert_eq!(
            store_path(Some(PathBuf::from("flag.json")), &defaults),
            PathBuf::from("flag.json")
        );
    }
}
