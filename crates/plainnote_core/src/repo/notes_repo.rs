//! Notes repository over an injected store.
//!
//! # Responsibility
//! - Map 1:1 onto store operations for higher layers.
//! - Keep insert-vs-update routing with the caller (id-zero sentinel).
//!
//! # Invariants
//! - No retry logic: failures here are local-disk failures, surfaced
//!   immediately.
//! - The store instance is dependency-injected so tests can swap it for an
//!   in-memory fake.

use crate::model::note::{Note, NoteId};
use crate::store::note_store::{NoteStore, NotesWatch, StoreResult};
use std::sync::Arc;

/// The only entry point presentation-facing layers use for note data.
pub struct NotesRepository {
    store: Arc<dyn NoteStore>,
}

impl NotesRepository {
    /// Creates a repository over the given store instance.
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Persists a new note and returns its store-assigned id.
    pub fn insert_note(&self, note: &Note) -> StoreResult<NoteId> {
        self.store.insert(note)
    }

    /// Overwrites an existing note's fields.
    pub fn update_note(&self, note: &Note) -> StoreResult<()> {
        self.store.update(note)
    }

    /// Deletes a note; silently succeeds when the id is already gone.
    pub fn delete_note(&self, id: NoteId) -> StoreResult<()> {
        self.store.delete(id)
    }

    /// Returns the full collection in insertion order.
    pub fn get_all_notes(&self) -> StoreResult<Vec<Note>> {
        self.store.all()
    }

    /// Subscribes to the live stream of full-collection snapshots.
    pub fn all_notes_stream(&self) -> StoreResult<NotesWatch> {
        self.store.subscribe()
    }
}
