// crates/cli/src/notes.rs
//! Handlers for `metrica notes ...`.

use crate::args::{BodyArgs, EditArgs, ListArgs, NewArgs, NotesCommand, SettingsArgs};
use crate::error::{AppError, Result};
use crate::options::{KindArg, ListFormat, ThemeArg};
use chrono::{Local, Utc};
use comfy_table::{CellAlignment, Table, presets};
use metrica_core::{AnalysisConfig, LineKind};
use metrica_engine::export;
use metrica_engine::notebook::Notebook;
use metrica_engine::notes::{Note, NoteFilter, NoteKind, normalize_tag, relative_date};
use metrica_engine::settings::{Settings, Theme};
use metrica_engine::store::NoteStore;
use std::fmt::Write;
use std::io::Read;
use std::path::Path;

impl From<KindArg> for NoteKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Poem => Self::Poem,
            KindArg::Song => Self::Song,
        }
    }
}

impl From<ThemeArg> for Theme {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Dark => Self::Dark,
            ThemeArg::Light => Self::Light,
        }
    }
}

/// Run one notes subcommand and return what should be printed on stdout.
///
/// # Errors
/// Returns an error for unknown note ids or structures, unreadable input, or
/// store failures.
pub fn execute<S: NoteStore>(notebook: &Notebook<S>, command: NotesCommand) -> Result<String> {
    if notebook.take_first_run()? {
        eprintln!("[metrica] New notebook. Create a note with `metrica notes new poem --structure soneto`.");
    }

    match command {
        NotesCommand::List(args) => list(notebook, &args),
        NotesCommand::Show { id, metric } => show(notebook, &id, metric),
        NotesCommand::New(args) => create(notebook, args),
        NotesCommand::Edit(args) => edit(notebook, args),
        NotesCommand::Tag { id, tags } => {
            let note = notebook.edit(&id, |n| {
                for tag in &tags {
                    n.add_tag(tag);
                }
            })?;
            Ok(format!("{}\n", note.tags.join(" ")))
        }
        NotesCommand::Untag { id, tags } => {
            let note = notebook.edit(&id, |n| {
                for tag in &tags {
                    n.remove_tag(tag);
                }
            })?;
            Ok(format!("{}\n", note.tags.join(" ")))
        }
        NotesCommand::Fav { id } => {
            let note = notebook.toggle_favorite(&id)?;
            let state = if note.favorite { "★ favorite" } else { "not favorite" };
            Ok(format!("{} {state}\n", note.id))
        }
        NotesCommand::Rm { id } => {
            let note = notebook.remove(&id)?;
            eprintln!("[metrica] Deleted \"{}\".", note.display_title());
            Ok(String::new())
        }
        NotesCommand::Tags => {
            let mut out = String::new();
            for tag in notebook.all_tags()? {
                let _ = writeln!(out, "#{tag}");
            }
            Ok(out)
        }
        NotesCommand::Export { id, output } => {
            let note = notebook.get(&id)?;
            let text = export::plain_text(&note);
            match output {
                Some(target) => {
                    let path = if target.is_dir() {
                        target.join(export::file_name(&note))
                    } else {
                        target
                    };
                    std::fs::write(&path, text + "\n")?;
                    eprintln!("[metrica] Exported to {}", path.display());
                    Ok(String::new())
                }
                None => Ok(text + "\n"),
            }
        }
        NotesCommand::Settings(args) => settings(notebook, &args),
    }
}

fn list<S: NoteStore>(notebook: &Notebook<S>, args: &ListArgs) -> Result<String> {
    let filter = NoteFilter {
        kind: args.kind.map(NoteKind::from),
        favorites_only: args.fav,
        tags: args.tags.iter().filter_map(|t| normalize_tag(t)).collect(),
        search: args.search.clone(),
    };
    let notes = notebook.filter(&filter)?;

    if args.format == ListFormat::Json {
        return Ok(serde_json::to_string_pretty(&notes)? + "\n");
    }
    if notes.is_empty() {
        return Ok("No notes.\n".to_string());
    }

    let now = Utc::now().with_timezone(&Local);
    let mut table = Table::new();
    table.load_preset(presets::UTF8_HORIZONTAL_ONLY);
    table.set_header(vec!["ID", "", "TYPE", "TITLE", "PREVIEW", "TAGS", "EDITED"]);
    for note in &notes {
        let mut kind = note.kind.label().to_string();
        if let Some(structure) = &note.structure {
            let _ = write!(kind, " · {structure}");
        }
        let preview: String = note.preview().chars().take(40).collect();
        table.add_row(vec![
            note.id.clone(),
            if note.favorite { "★".to_string() } else { String::new() },
            kind,
            note.display_title().to_string(),
            preview.replace('\n', " "),
            note.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" "),
            relative_date(&note.updated_at.with_timezone(&Local), &now),
        ]);
    }
    if let Some(column) = table.column_mut(6) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    Ok(format!("{table}\n"))
}

fn show<S: NoteStore>(notebook: &Notebook<S>, id: &str, metric: bool) -> Result<String> {
    let note = notebook.get(id)?;
    let mut out = export::plain_text(&note);
    out.push('\n');

    if !(metric || notebook.settings()?.metric) {
        return Ok(out);
    }

    let config = AnalysisConfig {
        skip_blank_lines: true,
        skip_section_markers: note.kind == NoteKind::Song,
    };
    let analysis = note.analysis(&config);
    out.push('\n');
    for line in &analysis.lines {
        match line.kind {
            LineKind::Verse => {
                let _ = writeln!(out, "{:>3}  {:>2}  {:<14} {}", line.line, line.syllables, line.verse, line.text);
            }
            LineKind::Section => {
                let _ = writeln!(out, "{:>3}      {}", line.line, line.text);
            }
            LineKind::Blank => {}
        }
    }
    let _ = writeln!(
        out,
        "\n{} words · {} syllables · {} chars",
        analysis.stats.words, analysis.stats.syllables, analysis.stats.chars
    );
    Ok(out)
}

fn read_body(body: &BodyArgs) -> Result<Option<String>> {
    if let Some(content) = &body.content {
        return Ok(Some(content.clone()));
    }
    match body.file.as_deref() {
        Some(path) if path == Path::new("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(Some(text))
        }
        Some(path) => Ok(Some(std::fs::read_to_string(path)?)),
        None => Ok(None),
    }
}

fn create<S: NoteStore>(notebook: &Notebook<S>, args: NewArgs) -> Result<String> {
    let kind = NoteKind::from(args.kind);
    if kind == NoteKind::Song && args.structure.is_some() {
        return Err(AppError::InvalidInput("songs do not take a structure".to_string()));
    }
    let body = read_body(&args.body)?;
    let mut note = notebook.create(kind, args.structure.as_deref())?;

    if args.title.is_some() || body.is_some() || !args.tags.is_empty() {
        note = notebook.edit(&note.id, |n| {
            if let Some(title) = args.title {
                n.title = title;
            }
            if let Some(content) = body {
                n.content = content;
            }
            for tag in &args.tags {
                n.add_tag(tag);
            }
        })?;
    }

    if let Some(structure) = note.structure.as_deref().and_then(metrica_core::PoemStructure::lookup) {
        eprintln!("{}", structure.guide());
    }
    Ok(format!("{}\n", note.id))
}

fn edit<S: NoteStore>(notebook: &Notebook<S>, args: EditArgs) -> Result<String> {
    let body = read_body(&args.body)?;
    if args.title.is_none() && body.is_none() {
        return Err(AppError::InvalidInput(
            "nothing to change: pass --title, --content or --file".to_string(),
        ));
    }
    let note: Note = notebook.edit(&args.id, |n| {
        if let Some(title) = args.title {
            n.title = title;
        }
        if let Some(content) = body {
            n.content = content;
        }
    })?;
    Ok(format!("{}\n", note.id))
}

fn settings<S: NoteStore>(notebook: &Notebook<S>, args: &SettingsArgs) -> Result<String> {
    let changes = args.theme.is_some()
        || args.toggle_theme
        || args.zoom.is_some()
        || args.zoom_in
        || args.zoom_out
        || args.rich_text.is_some()
        || args.metric.is_some();

    let current = if changes {
        notebook.update_settings(|s| {
            if let Some(theme) = args.theme {
                s.theme = theme.into();
            }
            if args.toggle_theme {
                s.toggle_theme();
            }
            if let Some(zoom) = args.zoom {
                s.set_zoom(zoom);
            }
            if args.zoom_in {
                s.zoom_in();
            }
            if args.zoom_out {
                s.zoom_out();
            }
            if let Some(rich) = args.rich_text {
                s.rich_text = rich;
            }
            if let Some(metric) = args.metric {
                s.metric = metric;
            }
        })?
    } else {
        notebook.settings()?
    };
    Ok(format_settings(&current))
}

fn format_settings(s: &Settings) -> String {
    let theme = match s.theme {
        Theme::Dark => "dark",
        Theme::Light => "light",
    };
    format!(
        "theme: {theme}\nzoom: {}%\nrich_text: {}\nmetric: {}\n",
        s.zoom_percent(),
        s.rich_text,
        s.metric
    )
}
