use crate::models::Note;

/// In-memory note storage.
///
/// Notes are kept in insertion order. Ids come from a counter that only ever
/// grows, so an id freed by a delete is never handed out again.
#[derive(Debug)]
pub struct Repository {
    next_id: i64,
    notes: Vec<Note>,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository {
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            notes: Vec::new(),
        }
    }

    pub fn create_note(&mut self, title: String, content: String) -> Note {
        let note = Note {
            id: self.next_id,
            title,
            content,
        };
        self.next_id += 1;
        self.notes.push(note.clone());

        tracing::debug!("Stored note with id {}", note.id);

        note
    }

    pub fn update_note(&mut self, id: i64, title: String, content: String) -> Option<Note> {
        let note = self.notes.iter_mut().find(|note| note.id == id)?;
        note.title = title;
        note.content = content;

        Some(note.clone())
    }

    pub fn delete_note(&mut self, id: i64) -> Option<Note> {
        let index = self.notes.iter().position(|note| note.id == id)?;

        Some(self.notes.remove(index))
    }

    pub fn get_one_note(&self, id: i64) -> Option<Note> {
        self.notes.iter().find(|note| note.id == id).cloned()
    }

    /// Returns an owned snapshot; later mutations do not show through it.
    pub fn get_all_notes(&self) -> Vec<Note> {
        self.notes.clone()
    }
}
