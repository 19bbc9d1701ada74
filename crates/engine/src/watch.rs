use crate::config::Config;
use crate::error::{EngineError, Result};
use notify::{RecursiveMode, Watcher};
use std::sync::mpsc::channel;

/// Watch the configured roots and run `on_event` after every burst of changes.
///
/// Runs `on_event` once up front, then blocks indefinitely.
///
/// # Errors
/// Returns an error if the watcher cannot be created or no root exists.
pub fn watch_loop<F>(config: &Config, mut on_event: F) -> Result<()>
where
    F: FnMut(),
{
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| match res {
        Ok(event) => {
            let _ = tx.send(event);
        }
        Err(e) => log::warn!("watch error: {e:?}"),
    })?;

    let mut watched = 0usize;
    for root in &config.walk.roots {
        if root.exists() {
            watcher.watch(root, RecursiveMode::Recursive)?;
            watched += 1;
        } else {
            log::warn!("not watching missing path {}", root.display());
        }
    }
    if watched == 0 {
        return Err(EngineError::Config("watch mode needs at least one existing path".to_string()));
    }

    eprintln!("[metrica] Watching {watched} path(s)...");
    on_event();

    let debounce_interval = config.watch_interval;

    while rx.recv().is_ok() {
        std::thread::sleep(debounce_interval);
        while rx.try_recv().is_ok() {}

        log::debug!("change detected, re-running analysis");
        on_event();
    }

    Ok(())
}
