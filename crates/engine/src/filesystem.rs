use crate::config::WalkOptions;
use crate::error::Result;
use crossbeam_channel::Sender;
use ignore::WalkBuilder;
use std::path::PathBuf;

/// Parallel recursive walk over `options.roots`, sending every text file found.
///
/// Roots that are files are always sent; files discovered inside directories
/// must match `allow_ext` (when it is non-empty).
///
/// # Errors
/// Returns an error if a root does not exist.
pub fn walk_parallel(options: &WalkOptions, tx: &Sender<(PathBuf, std::fs::Metadata)>) -> Result<()> {
    if options.roots.is_empty() {
        return Ok(());
    }

    for root in &options.roots {
        if !root.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("path not found: {}", root.display()),
            )
            .into());
        }
    }

    let mut builder = WalkBuilder::new(&options.roots[0]);
    for root in &options.roots[1..] {
        builder.add(root);
    }

    builder
        .threads(options.threads)
        .hidden(!options.hidden)
        .git_ignore(options.git_ignore)
        .follow_links(options.follow_links)
        .max_depth(options.max_depth);

    let allow_ext = options.allow_ext.clone();
    builder.filter_entry(move |entry| {
        if entry.depth() == 0 || entry.file_type().is_some_and(|ft| ft.is_dir()) {
            return true;
        }
        if allow_ext.is_empty() {
            return true;
        }
        entry
            .path()
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| allow_ext.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    });

    let walker = builder.build_parallel();
    walker.run(|| {
        let tx = tx.clone();
        Box::new(move |entry| {
            match entry {
                Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
                    if let Ok(meta) = entry.metadata() {
                        let _ = tx.send((entry.path().to_owned(), meta));
                    }
                }
                Ok(_) => {}
                Err(err) => log::warn!("walk error: {err}"),
            }
            ignore::WalkState::Continue
        })
    });

    Ok(())
}
