// crates/engine/src/notebook.rs
//! Note management on top of a [`NoteStore`].

use chrono::{DateTime, Utc};
use hashbrown::HashSet;
use metrica_core::PoemStructure;

use crate::error::{EngineError, Result};
use crate::notes::{Note, NoteFilter, NoteKind};
use crate::settings::Settings;
use crate::store::NoteStore;

pub struct Notebook<S> {
    store: S,
    clock: fn() -> DateTime<Utc>,
}

impl<S: NoteStore> Notebook<S> {
    pub fn new(store: S) -> Self {
        Self { store, clock: Utc::now }
    }

    /// Use `clock` instead of the system time for new timestamps.
    pub fn with_clock(store: S, clock: fn() -> DateTime<Utc>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an empty note and persist it.
    ///
    /// # Errors
    /// Fails for a structure key missing from the catalog, or when the store fails.
    pub fn create(&self, kind: NoteKind, structure: Option<&str>) -> Result<Note> {
        let structure = match (kind, structure) {
            (NoteKind::Poem, Some(key)) => Some(
                PoemStructure::lookup(key)
                    .ok_or_else(|| EngineError::UnknownStructure(key.to_string()))?
                    .key
                    .to_string(),
            ),
            _ => None,
        };
        let note = Note::new(kind, structure, (self.clock)());
        self.save(note)
    }

    /// Persist `note`, bumping its `updated_at`. Known ids are replaced in
    /// place; new notes go to the front.
    pub fn save(&self, mut note: Note) -> Result<Note> {
        note.updated_at = (self.clock)();
        self.store.update_notes(|notes| {
            match notes.iter_mut().find(|n| n.id == note.id) {
                Some(slot) => *slot = note.clone(),
                None => notes.insert(0, note.clone()),
            }
            Ok(())
        })?;
        log::debug!("saved note {}", note.id);
        Ok(note)
    }

    /// Delete a note by exact id or unique id prefix.
    pub fn remove(&self, id: &str) -> Result<Note> {
        self.store.update_notes(|notes| {
            let pos = find_index(notes, id)?;
            Ok(notes.remove(pos))
        })
    }

    /// Every note, most recently updated first.
    pub fn all(&self) -> Result<Vec<Note>> {
        let mut notes = self.store.load_notes()?;
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    /// Look a note up by exact id, or by a prefix matching exactly one note.
    pub fn get(&self, id: &str) -> Result<Note> {
        let mut notes = self.store.load_notes()?;
        let pos = find_index(&notes, id)?;
        Ok(notes.swap_remove(pos))
    }

    /// Distinct tags in first-seen order over [`Self::all`].
    pub fn all_tags(&self) -> Result<Vec<String>> {
        let notes = self.all()?;
        let mut seen = HashSet::new();
        Ok(notes
            .iter()
            .flat_map(|n| n.tags.iter())
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect())
    }

    pub fn filter(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        Ok(self.all()?.into_iter().filter(|n| filter.matches(n)).collect())
    }

    /// Apply `edit` to a stored note and bump its `updated_at`, holding the
    /// store for the whole change.
    pub fn edit<F>(&self, id: &str, edit: F) -> Result<Note>
    where
        F: FnOnce(&mut Note),
    {
        let now = (self.clock)();
        self.store.update_notes(|notes| {
            let pos = find_index(notes, id)?;
            let note = &mut notes[pos];
            edit(note);
            note.updated_at = now;
            Ok(note.clone())
        })
    }

    pub fn toggle_favorite(&self, id: &str) -> Result<Note> {
        self.edit(id, |n| n.favorite = !n.favorite)
    }

    pub fn settings(&self) -> Result<Settings> {
        self.store.load_settings()
    }

    pub fn update_settings<F>(&self, change: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        self.store.update_settings(|settings| {
            change(settings);
            Ok(*settings)
        })
    }

    /// Returns `true` exactly once per store, on the first call.
    pub fn take_first_run(&self) -> Result<bool> {
        let first = self.store.is_first_run()?;
        if first {
            self.store.mark_first_run()?;
        }
        Ok(first)
    }
}

fn find_index(notes: &[Note], id: &str) -> Result<usize> {
    if let Some(pos) = notes.iter().position(|n| n.id == id) {
        return Ok(pos);
    }
    if id.is_empty() {
        return Err(EngineError::NoteNotFound(id.to_string()));
    }
    let mut matches = notes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.id.starts_with(id))
        .map(|(i, _)| i);
    match (matches.next(), matches.next()) {
        (Some(pos), None) => Ok(pos),
        _ => Err(EngineError::NoteNotFound(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicI64, Ordering};

    // Strictly increasing clock so ordering by updated_at is deterministic
    fn ticking_clock() -> DateTime<Utc> {
        static NOW: AtomicI64 = AtomicI64::new(1_700_000_000_000);
        let ms = NOW.fetch_add(1_000, Ordering::SeqCst);
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn notebook() -> Notebook<MemoryStore> {
        Notebook::with_clock(MemoryStore::new(), ticking_clock)
    }

    #[test]
    fn create_persists_and_validates_structure() {
        let nb = notebook();
        let poem = nb.create(NoteKind::Poem, Some("Soneto")).unwrap();
        assert_eq!(poem.structure.as_deref(), Some("soneto"));
        assert_eq!(nb.all().unwrap().len(), 1);

        let song = nb.create(NoteKind::Song, Some("soneto")).unwrap();
        assert_eq!(song.structure, None);

        assert!(matches!(
            nb.create(NoteKind::Poem, Some("ovillejo")),
            Err(EngineError::UnknownStructure(_))
        ));
    }

    #[test]
    fn save_replaces_and_orders_by_update() {
        let nb = notebook();
        let first = nb.create(NoteKind::Poem, None).unwrap();
        let second = nb.create(NoteKind::Song, None).unwrap();

        let ids: Vec<_> = nb.all().unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, [second.id.clone(), first.id.clone()]);

        let mut edited = first.clone();
        edited.title = "Nocturno".to_string();
        let saved = nb.save(edited).unwrap();
        assert!(saved.updated_at > first.updated_at);

        let all = nb.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Nocturno");
    }

    #[test]
    fn get_and_remove_accept_unique_prefix() {
        let nb = notebook();
        let note = nb.create(NoteKind::Poem, None).unwrap();
        assert_eq!(nb.get(&note.id).unwrap().id, note.id);

        assert!(matches!(nb.get("nope"), Err(EngineError::NoteNotFound(_))));
        let removed = nb.remove(&note.id).unwrap();
        assert_eq!(removed.id, note.id);
        assert!(nb.all().unwrap().is_empty());
    }

    #[test]
    fn ambiguous_prefix_is_not_found() {
        let nb = notebook();
        let a = nb.create(NoteKind::Poem, None).unwrap();
        nb.create(NoteKind::Poem, None).unwrap();
        // Both ids share the leading timestamp digits
        assert!(nb.get(&a.id[..2]).is_err());
        assert!(nb.get("").is_err());
    }

    #[test]
    fn tags_are_collected_in_first_seen_order() {
        let nb = notebook();
        let a = nb.create(NoteKind::Poem, None).unwrap();
        nb.edit(&a.id, |n| {
            n.add_tag("mar");
            n.add_tag("noche");
        })
        .unwrap();
        let b = nb.create(NoteKind::Song, None).unwrap();
        nb.edit(&b.id, |n| {
            n.add_tag("noche");
            n.add_tag("fiesta");
        })
        .unwrap();

        assert_eq!(nb.all_tags().unwrap(), ["noche", "fiesta", "mar"]);
    }

    #[test]
    fn filter_and_favorites() {
        let nb = notebook();
        let a = nb.create(NoteKind::Poem, None).unwrap();
        nb.create(NoteKind::Song, None).unwrap();
        let fav = nb.toggle_favorite(&a.id).unwrap();
        assert!(fav.favorite);

        let favorites = nb
            .filter(&NoteFilter {
                favorites_only: true,
                ..NoteFilter::default()
            })
            .unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, a.id);

        let songs = nb
            .filter(&NoteFilter {
                kind: Some(NoteKind::Song),
                ..NoteFilter::default()
            })
            .unwrap();
        assert_eq!(songs.len(), 1);
    }

    #[test]
    fn concurrent_writers_keep_every_note() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notas.json");
        let threads = 8;
        let per_thread = 25;

        std::thread::scope(|scope| {
            for _ in 0..threads {
                let path = path.clone();
                scope.spawn(move || {
                    let nb = Notebook::new(JsonFileStore::new(path));
                    for _ in 0..per_thread {
                        nb.create(NoteKind::Song, None).unwrap();
                    }
                });
            }
        });

        let nb = Notebook::new(JsonFileStore::new(&path));
        let notes = nb.all().unwrap();
        assert_eq!(notes.len(), threads * per_thread);
        let ids: HashSet<_> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), notes.len());
    }

    #[test]
    fn failed_edit_writes_nothing() {
        let nb = notebook();
        let note = nb.create(NoteKind::Poem, None).unwrap();
        assert!(matches!(nb.edit("zzzz", |n| n.favorite = true), Err(EngineError::NoteNotFound(_))));
        assert!(!nb.get(&note.id).unwrap().favorite);
    }

    #[test]
    fn settings_and_first_run() {
        let nb = notebook();
        assert!(nb.take_first_run().unwrap());
        assert!(!nb.take_first_run().unwrap());

        let s = nb.update_settings(|s| {
            s.zoom_in();
            s.metric = true;
        })
        .unwrap();
        assert_eq!(s.zoom_percent(), 110);
        assert_eq!(nb.settings().unwrap(), s);
    }
}
