// File: ./src/store.rs
// Read-only access to the note graph. The only suspension point in the
// builder pipeline; fetching N notes must be one round trip, not N.
use crate::model::Note;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Batch fetch. Unknown identifiers are skipped; result order is not
    /// guaranteed to match the input.
    async fn get_notes(&self, note_ids: &[String]) -> Result<Vec<Note>>;

    /// All descendant note ids of the given note, any depth.
    async fn get_subtree_note_ids(&self, note_id: &str) -> Result<Vec<String>>;

    /// Day-of-month -> date-note-id mapping for one `YYYY-MM` month under a
    /// calendar root note.
    async fn get_month_date_notes(
        &self,
        calendar_root_id: &str,
        month: &str,
    ) -> Result<BTreeMap<String, String>>;
}

/// A note graph held fully in memory. Backs the integration tests and any
/// embedder that already has its notes loaded.
#[derive(Default)]
pub struct InMemoryNoteStore {
    notes: HashMap<String, Note>,
    month_date_notes: HashMap<(String, String), BTreeMap<String, String>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, note: Note) {
        self.notes.insert(note.note_id.clone(), note);
    }

    pub fn insert_all(&mut self, notes: impl IntoIterator<Item = Note>) {
        for note in notes {
            self.insert(note);
        }
    }

    pub fn set_month_date_notes(
        &mut self,
        calendar_root_id: &str,
        month: &str,
        day_to_note_id: BTreeMap<String, String>,
    ) {
        self.month_date_notes
            .insert((calendar_root_id.to_string(), month.to_string()), day_to_note_id);
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn get_notes(&self, note_ids: &[String]) -> Result<Vec<Note>> {
        Ok(note_ids
            .iter()
            .filter_map(|id| self.notes.get(id).cloned())
            .collect())
    }

    async fn get_subtree_note_ids(&self, note_id: &str) -> Result<Vec<String>> {
        // Iterative walk; relations may form cycles but child links can too
        // in a malformed graph, so track visited ids.
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut pending: Vec<String> = match self.notes.get(note_id) {
            Some(note) => note.child_note_ids.clone(),
            None => return Ok(result),
        };

        while let Some(id) = pending.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            if let Some(child) = self.notes.get(&id) {
                pending.extend(child.child_note_ids.iter().cloned());
            }
            result.push(id);
        }
        Ok(result)
    }

    async fn get_month_date_notes(
        &self,
        calendar_root_id: &str,
        month: &str,
    ) -> Result<BTreeMap<String, String>> {
        Ok(self
            .month_date_notes
            .get(&(calendar_root_id.to_string(), month.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
