use clap::Parser;
use metrica_cli::args::{AnalyzeArgs, Cli, Command, StructuresArgs, VerseArgs};
use metrica_cli::config::{self, Config, FileDefaults};
use metrica_cli::error::{AppError, Result};
use metrica_cli::options::ListFormat;
use metrica_cli::{notes, presentation};
use metrica_core::{PoemStructure, VerseKind, verse_name};
use metrica_engine::notebook::Notebook;
use metrica_engine::options::WatchOutput;
use metrica_engine::stats::RunResult;
use metrica_engine::store::JsonFileStore;
use std::fmt::Write as _;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[metrica] Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let defaults = match &cli.config {
        Some(path) => FileDefaults::load(path)?,
        None => FileDefaults::default(),
    };

    match cli.command {
        Command::Analyze(args) => analyze(args, &defaults),
        Command::Verse(args) => {
            print!("{}", verse(&args));
            Ok(())
        }
        Command::Structures(args) => {
            print!("{}", structures(&args)?);
            Ok(())
        }
        Command::Notes(args) => {
            let path = config::store_path(args.store, &defaults);
            log::debug!("using notes store {}", path.display());
            let notebook = Notebook::new(JsonFileStore::new(path));
            print!("{}", notes::execute(&notebook, args.command)?);
            Ok(())
        }
    }
}

fn analyze(args: AnalyzeArgs, defaults: &FileDefaults) -> Result<()> {
    let config = config::analyze_config(args, defaults)?;

    if config.watch {
        if config.read_stdin || config.inline_text.is_some() {
            return Err(AppError::InvalidInput("--watch needs file or directory paths".to_string()));
        }
        let run_cycle = || {
            presentation::clear_screen(config.watch_output);
            match metrica_engine::run(&config) {
                Ok(result) => {
                    if let Err(e) = emit(&result, &config) {
                        eprintln!("[metrica] Error: {e}");
                    }
                }
                Err(e) => eprintln!("[metrica] Error in watch cycle: {e}"),
            }
        };
        metrica_engine::watch::watch_loop(&config, run_cycle)?;
        return Ok(());
    }

    let result = metrica_engine::run(&config)?;
    emit(&result, &config)
}

fn emit(result: &RunResult, config: &Config) -> Result<()> {
    for (path, err) in &result.errors {
        eprintln!("[warn] {}: {err}", path.display());
    }
    let rendered = presentation::render(result, config)?;
    match &config.output_path {
        Some(path) if !(config.watch && config.watch_output == WatchOutput::Jsonl) => {
            std::fs::write(path, rendered)?;
            eprintln!("[metrica] Wrote {}", path.display());
        }
        _ => print!("{rendered}"),
    }
    Ok(())
}

fn verse(args: &VerseArgs) -> String {
    if let Some(n) = args.syllables {
        return format!("{}\n", verse_name(n));
    }
    let mut out = String::new();
    for kind in VerseKind::ALL {
        let art = if kind.is_arte_menor() { "arte menor" } else { "arte mayor" };
        let _ = writeln!(out, "{:>2}  {:<14} {art}", kind.syllables(), kind.name());
    }
    out
}

fn structures(args: &StructuresArgs) -> Result<String> {
    if let Some(key) = &args.key {
        let structure = PoemStructure::lookup(key)
            .ok_or_else(|| metrica_engine::error::EngineError::UnknownStructure(key.clone()))?;
        return match args.format {
            ListFormat::Json => Ok(serde_json::to_string_pretty(structure)? + "\n"),
            ListFormat::Table => Ok(format!("{}\n\n{}\n", structure.name, structure.guide())),
        };
    }

    let all = PoemStructure::all();
    if args.format == ListFormat::Json {
        return Ok(serde_json::to_string_pretty(all)? + "\n");
    }
    let mut out = String::new();
    for s in all {
        let verses = s
            .expected_verses()
            .map_or_else(|| "free".to_string(), |n| format!("{n} verses"));
        let _ = writeln!(out, "{:<10} {:<10} {verses}", s.key, s.name);
    }
    Ok(out)
}
