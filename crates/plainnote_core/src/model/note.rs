//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted record of the notes pipeline.
//! - Encode the "id zero means not yet persisted" lifecycle convention.
//!
//! # Invariants
//! - `id` is assigned by the store on first insert and never changes.
//! - `timestamp` reflects the most recent successful save, not creation time.

use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// Sentinel id for notes that have not been persisted yet.
///
/// Callers route insert-vs-update on this value; the store always assigns a
/// fresh id on insert regardless of what the draft carries.
pub const UNSAVED_NOTE_ID: NoteId = 0;

/// The persisted note record.
///
/// Constructed transiently with [`Note::draft`], persisted on first insert
/// (the store assigns `id` and stamps `timestamp`), hard-deleted on delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned id; [`UNSAVED_NOTE_ID`] until first insert.
    pub id: NoteId,
    /// Display title. May be empty; no uniqueness constraint.
    pub title: String,
    /// Body text. May be empty.
    pub content: String,
    /// Epoch milliseconds of the last successful save.
    pub timestamp: i64,
}

impl Note {
    /// Creates a transient note that has not been persisted yet.
    ///
    /// # Invariants
    /// - `id` starts as [`UNSAVED_NOTE_ID`].
    /// - `timestamp` starts at zero; the store stamps it on save.
    pub fn draft(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_NOTE_ID,
            title: title.into(),
            content: content.into(),
            timestamp: 0,
        }
    }

    /// Returns whether this note has been assigned a store id.
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_NOTE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, UNSAVED_NOTE_ID};

    #[test]
    fn draft_starts_unpersisted() {
        let note = Note::draft("groceries", "milk, eggs");
        assert_eq!(note.id, UNSAVED_NOTE_ID);
        assert_eq!(note.timestamp, 0);
        assert!(!note.is_persisted());
    }

    #[test]
    fn assigned_id_marks_note_persisted() {
        let mut note = Note::draft("", "");
        note.id = 7;
        assert!(note.is_persisted());
    }
}
