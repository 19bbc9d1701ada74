// crates/engine/src/lib.rs
//! File analysis, watch mode and note storage around `metrica_core`.

use rayon::prelude::*;
use std::io::Read;
use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod export;
pub mod filesystem;
pub mod notebook;
pub mod notes;
pub mod options;
pub mod processor;
pub mod settings;
pub mod stats;
pub mod store;
pub mod watch;

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::stats::{FileReport, RunResult, Source};

/// Run the analysis over every configured source.
///
/// Files under `config.walk.roots` are analyzed in parallel; stdin and inline
/// text are appended afterwards. Reports are ordered by source name.
///
/// # Errors
///
/// Returns an error for an unknown structure key, an unreadable stdin, or
/// (in strict mode) the first failing file. Otherwise per-file failures are
/// collected in `RunResult::errors`.
pub fn run(config: &Config) -> Result<RunResult> {
    let structure = processor::resolve_structure(config)?;

    let mut result = analyze_files(config, structure)?;

    if config.read_stdin {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        result
            .reports
            .push(processor::process_text(Source::Stdin, &text, config, structure));
    }
    if let Some(text) = &config.inline_text {
        result
            .reports
            .push(processor::process_text(Source::Inline, text, config, structure));
    }

    log::debug!(
        "analyzed {} source(s), {} error(s)",
        result.reports.len(),
        result.errors.len()
    );
    Ok(result)
}

fn analyze_files(
    config: &Config,
    structure: Option<&'static metrica_core::PoemStructure>,
) -> Result<RunResult> {
    if config.walk.roots.is_empty() {
        return Ok(RunResult::default());
    }

    let (tx, rx) = crossbeam_channel::bounded(1024);
    let (err_tx, err_rx) = std::sync::mpsc::channel();

    let walk_cfg = config.walk.clone();
    std::thread::spawn(move || {
        if let Err(e) = crate::filesystem::walk_parallel(&walk_cfg, &tx) {
            let _ = err_tx.send(e);
        }
    });

    let iter = rx.into_iter().par_bridge();

    let mut result = if config.strict {
        let reports = iter
            .map(|item| processor::process_file(item, config, structure))
            .collect::<Result<Vec<_>>>()?;
        RunResult {
            reports,
            errors: Vec::new(),
        }
    } else {
        let (reports, errors): (Vec<FileReport>, Vec<(PathBuf, EngineError)>) = iter
            .map(|item| {
                let path = item.0.clone();
                log::debug!("analyzing {}", path.display());
                processor::process_file(item, config, structure).map_err(|e| (path, e))
            })
            .partition_map(|r| match r {
                Ok(report) => rayon::iter::Either::Left(report),
                Err(err) => rayon::iter::Either::Right(err),
            });
        RunResult { reports, errors }
    };

    // The walker thread reports failures after the channel closes
    if let Ok(walk_err) = err_rx.recv() {
        if config.strict {
            return Err(walk_err);
        }
        result.errors.push((PathBuf::from("<walk>"), walk_err));
    }

    result
        .reports
        .sort_by(|a, b| a.source.display_name().cmp(&b.source.display_name()));
    Ok(result)
}
