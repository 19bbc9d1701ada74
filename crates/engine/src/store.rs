// crates/engine/src/store.rs
//! Persistence port for notes and settings, with a JSON file adapter.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::notes::Note;
use crate::settings::Settings;

/// Storage backend used by [`crate::notebook::Notebook`].
///
/// `update_notes` and `update_settings` run their closure and persist the
/// result as one step; nothing is written when the closure fails.
pub trait NoteStore {
    fn load_notes(&self) -> Result<Vec<Note>>;
    fn save_notes(&self, notes: &[Note]) -> Result<()>;
    fn update_notes<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Note>) -> Result<T>;
    fn load_settings(&self) -> Result<Settings>;
    fn save_settings(&self, settings: &Settings) -> Result<()>;
    fn update_settings<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Settings) -> Result<T>;
    fn is_first_run(&self) -> Result<bool>;
    fn mark_first_run(&self) -> Result<()>;
}

/// Everything a store persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreDocument {
    pub notes: Vec<Note>,
    pub settings: Settings,
    pub first_run_done: bool,
}

/// Store backed by one JSON document on disk.
///
/// Every access holds an `fs2` lock on a sibling `.lock` file; writes go
/// through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn lock(&self, exclusive: bool) -> Result<File> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_err(e))?;
        }
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| EngineError::StoreLock {
                path: lock_path.clone(),
                source,
            })?;
        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(|source| EngineError::StoreLock {
            path: lock_path,
            source,
        })?;
        Ok(file)
    }

    fn write_err(&self, source: std::io::Error) -> EngineError {
        EngineError::FileWrite {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the document. A missing file is an empty document; an unparsable
    /// one is logged and treated as empty.
    fn read_unlocked(&self) -> Result<StoreDocument> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoreDocument::default()),
            Err(source) => {
                return Err(EngineError::FileRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                log::warn!("ignoring unreadable store {}: {e}", self.path.display());
                Ok(StoreDocument::default())
            }
        }
    }

    fn write_unlocked(&self, doc: &StoreDocument) -> Result<()> {
        let data = serde_json::to_vec_pretty(doc)?;
        atomic_write(&self.path, &data).map_err(|e| self.write_err(e))
    }

    /// Load the whole document under a shared lock.
    pub fn read(&self) -> Result<StoreDocument> {
        let lock = self.lock(false)?;
        let doc = self.read_unlocked();
        let _ = FileExt::unlock(&lock);
        doc
    }

    /// Read-modify-write the document under one exclusive lock. The document
    /// is written back only when `apply` succeeds.
    pub fn update<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut StoreDocument) -> Result<T>,
    {
        let lock = self.lock(true)?;
        let result = self.read_unlocked().and_then(|mut doc| {
            let value = apply(&mut doc)?;
            self.write_unlocked(&doc)?;
            Ok(value)
        });
        let _ = FileExt::unlock(&lock);
        result
    }
}

impl NoteStore for JsonFileStore {
    fn load_notes(&self) -> Result<Vec<Note>> {
        Ok(self.read()?.notes)
    }

    fn save_notes(&self, notes: &[Note]) -> Result<()> {
        log::debug!("saving {} note(s) to {}", notes.len(), self.path.display());
        self.update(|doc| {
            doc.notes = notes.to_vec();
            Ok(())
        })
    }

    fn update_notes<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Note>) -> Result<T>,
    {
        self.update(|doc| apply(&mut doc.notes))
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(self.read()?.settings)
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.update(|doc| {
            doc.settings = *settings;
            Ok(())
        })
    }

    fn update_settings<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Settings) -> Result<T>,
    {
        self.update(|doc| apply(&mut doc.settings))
    }

    fn is_first_run(&self) -> Result<bool> {
        Ok(!self.read()?.first_run_done)
    }

    fn mark_first_run(&self) -> Result<()> {
        self.update(|doc| {
            doc.first_run_done = true;
            Ok(())
        })
    }
}

/// Write `data` to `path` via a temp file in the same directory and a rename.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp = parent.join(format!(".{}.{}.tmp", std::process::id(), nanos));

    let file = File::create(&tmp)?;
    let mut w = BufWriter::new(file);
    w.write_all(data)?;
    w.flush()?;
    let _ = w.get_ref().sync_all();

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    #[cfg(unix)]
    {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
    Ok(())
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<StoreDocument>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            doc: Mutex::new(StoreDocument {
                notes,
                ..StoreDocument::default()
            }),
        }
    }

    fn with_doc<T>(&self, f: impl FnOnce(&mut StoreDocument) -> T) -> T {
        let mut guard = self.doc.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }
}

impl NoteStore for MemoryStore {
    fn load_notes(&self) -> Result<Vec<Note>> {
        Ok(self.with_doc(|doc| doc.notes.clone()))
    }

    fn save_notes(&self, notes: &[Note]) -> Result<()> {
        self.with_doc(|doc| doc.notes = notes.to_vec());
        Ok(())
    }

    fn update_notes<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Note>) -> Result<T>,
    {
        self.with_doc(|doc| {
            let mut notes = doc.notes.clone();
            let value = apply(&mut notes)?;
            doc.notes = notes;
            Ok(value)
        })
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(self.with_doc(|doc| doc.settings))
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.with_doc(|doc| doc.settings = *settings);
        Ok(())
    }

    fn update_settings<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Settings) -> Result<T>,
    {
        self.with_doc(|doc| {
            let mut settings = doc.settings;
            let value = apply(&mut settings)?;
            doc.settings = settings;
            Ok(value)
        })
    }

    fn is_first_run(&self) -> Result<bool> {
        Ok(self.with_doc(|doc| !doc.first_run_done))
    }

    fn mark_first_run(&self) -> Result<()> {
        self.with_doc(|doc| doc.first_run_done = true);
        Ok(())
    }
}
