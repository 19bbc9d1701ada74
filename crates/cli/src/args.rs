// crates/cli/src/args.rs
use crate::options::{KindArg, ListFormat, OutputFormat, OutputMode, SortSpec, ThemeArg, WatchOutput};
use crate::parsers;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "metrica",
    version,
    about = "Métrica española: sílabas, versos y notas para poetas y compositores"
)]
pub struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// YAML or JSON file with default options
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count syllables and name the verses of files, directories, stdin or text
    Analyze(AnalyzeArgs),
    /// Name the verse for a syllable count, or list every verse name
    Verse(VerseArgs),
    /// List poem structures, or show the guide for one of them
    Structures(StructuresArgs),
    /// Manage poems and songs
    Notes(NotesArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub metric: MetricOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub scan: ScanOptions,

    #[command(flatten)]
    pub behavior: BehaviorOptions,

    /// Files or directories; `-` reads stdin
    #[arg(value_hint = ValueHint::AnyPath, help_heading = "Input")]
    pub paths: Vec<PathBuf>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct MetricOptions {
    /// Analyze this text instead of reading files
    #[arg(long, short = 't', help_heading = "Metric")]
    pub text: Option<String>,

    /// Check every source against a poem structure (soneto, haiku, ...)
    #[arg(long, short = 's', help_heading = "Metric")]
    pub structure: Option<String>,

    /// Report `[Estribillo]`-style lines as sections instead of verses
    #[arg(long, help_heading = "Metric")]
    pub skip_sections: bool,

    /// Leave blank lines out of per-line output
    #[arg(long, help_heading = "Metric")]
    pub skip_blank: bool,
}

#[derive(ClapArgs, Debug, Default)]
pub struct OutputOptions {
    /// Output format
    #[arg(long, short = 'f', value_enum, help_heading = "Output")]
    pub format: Option<OutputFormat>,

    /// Output mode (summary, lines, total-only)
    #[arg(long, value_enum, default_value = "summary", help_heading = "Output")]
    pub output_mode: OutputMode,

    /// Shorthand for `--output-mode lines`
    #[arg(long, short = 'l', help_heading = "Output")]
    pub lines: bool,

    /// Sort keys (e.g. syllables:desc,name)
    #[arg(long, help_heading = "Output")]
    pub sort: Option<SortSpec>,

    /// Append a TOTAL row to CSV/TSV output
    #[arg(long, help_heading = "Output")]
    pub total_row: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath, help_heading = "Output")]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ScanOptions {
    /// Extensions read when walking directories (default: txt,md,text)
    #[arg(long, value_delimiter = ',', help_heading = "Input")]
    pub ext: Vec<String>,

    /// Include hidden files
    #[arg(long, help_heading = "Input")]
    pub hidden: bool,

    /// Do not honor .gitignore files
    #[arg(long, help_heading = "Input")]
    pub no_gitignore: bool,

    #[arg(long, help_heading = "Input")]
    pub max_depth: Option<usize>,

    /// Follow symbolic links
    #[arg(long, help_heading = "Input")]
    pub follow: bool,

    /// Walker threads (default: number of CPUs)
    #[arg(long, short = 'j', value_parser = parsers::parse_positive_usize, help_heading = "Input")]
    pub jobs: Option<usize>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct BehaviorOptions {
    /// Abort on the first unreadable file
    #[arg(long, help_heading = "Behavior")]
    pub strict: bool,

    /// Re-run the analysis whenever a watched file changes
    #[arg(long, short = 'w', help_heading = "Behavior")]
    pub watch: bool,

    /// Seconds to wait for a burst of changes to settle
    #[arg(long, value_parser = parsers::parse_positive_u64, help_heading = "Behavior")]
    pub watch_interval: Option<u64>,

    #[arg(long, value_enum, default_value = "full", help_heading = "Behavior")]
    pub watch_output: WatchOutput,
}

#[derive(ClapArgs, Debug)]
pub struct VerseArgs {
    /// Syllable count; omit to list every named verse
    pub syllables: Option<usize>,
}

#[derive(ClapArgs, Debug)]
pub struct StructuresArgs {
    /// Structure key (soneto, cuarteto, lira, haiku, silva, libre)
    pub key: Option<String>,

    #[arg(long, short = 'f', value_enum, default_value = "table")]
    pub format: ListFormat,
}

#[derive(ClapArgs, Debug)]
pub struct NotesArgs {
    /// Notes file (default: $METRICA_STORE, then the config file, then ~/.metrica/notes.json)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: NotesCommand,
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// List notes, most recently edited first
    List(ListArgs),
    /// Print a note, optionally with per-line metrics
    Show {
        id: String,
        /// Print syllables and verse names per line
        #[arg(long, short = 'm')]
        metric: bool,
    },
    /// Create a note and print its id
    New(NewArgs),
    /// Change a note's title or content
    Edit(EditArgs),
    /// Add tags to a note
    Tag {
        id: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove tags from a note
    Untag {
        id: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Toggle a note's favorite mark
    Fav { id: String },
    /// Delete a note
    Rm { id: String },
    /// List every tag in use
    Tags,
    /// Export a note as plain text
    Export {
        id: String,
        /// Target file or directory (stdout when omitted)
        #[arg(long, short = 'o', value_hint = ValueHint::AnyPath)]
        output: Option<PathBuf>,
    },
    /// Show or change settings
    Settings(SettingsArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct ListArgs {
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Favorites only
    #[arg(long)]
    pub fav: bool,

    /// Notes must carry every tag given
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Case-insensitive search in title and content
    #[arg(long, short = 'q')]
    pub search: Option<String>,

    #[arg(long, short = 'f', value_enum, default_value = "table")]
    pub format: ListFormat,
}

#[derive(ClapArgs, Debug)]
pub struct NewArgs {
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Poem structure key (poems only)
    #[arg(long, short = 's')]
    pub structure: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub body: BodyArgs,

    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,
}

#[derive(ClapArgs, Debug)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub body: BodyArgs,
}

#[derive(ClapArgs, Debug, Default)]
#[group(multiple = false)]
pub struct BodyArgs {
    /// Note content
    #[arg(long, short = 'c')]
    pub content: Option<String>,

    /// Read the content from a file (`-` for stdin)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct SettingsArgs {
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Switch between dark and light
    #[arg(long, conflicts_with = "theme")]
    pub toggle_theme: bool,

    /// Zoom factor (e.g. 1.2 or 120%)
    #[arg(long, value_parser = parsers::parse_zoom, conflicts_with_all = ["zoom_in", "zoom_out"])]
    pub zoom: Option<f64>,

    #[arg(long, conflicts_with = "zoom_out")]
    pub zoom_in: bool,

    #[arg(long)]
    pub zoom_out: bool,

    #[arg(long, action = ArgAction::Set)]
    pub rich_text: Option<bool>,

    /// Show per-line metrics in `notes show`
    #[arg(long, action = ArgAction::Set)]
    pub metric: Option<bool>,
}
