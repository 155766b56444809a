//! Application composition root.
//!
//! # Responsibility
//! - Construct exactly one store, repository and synchronizer per container.
//!
//! # Invariants
//! - "Exactly one store instance" is preserved by ownership: the container is
//!   built once at process startup and passed by reference, with no hidden
//!   global state.

use crate::config::CoreConfig;
use crate::repo::notes_repo::NotesRepository;
use crate::store::note_store::{SqliteNoteStore, StoreResult};
use crate::view::synchronizer::ViewStateSynchronizer;
use std::sync::Arc;

/// Owns the wired persistence-to-presentation pipeline.
pub struct AppContainer {
    repository: Arc<NotesRepository>,
    synchronizer: ViewStateSynchronizer,
}

impl AppContainer {
    /// Opens the file-backed store named by the config and wires the
    /// pipeline around it.
    pub fn open(config: &CoreConfig) -> StoreResult<Self> {
        Ok(Self::wire(SqliteNoteStore::open(&config.db_path)?, config))
    }

    /// In-memory variant for tests and smoke probes.
    pub fn open_in_memory(config: &CoreConfig) -> StoreResult<Self> {
        Ok(Self::wire(SqliteNoteStore::open_in_memory()?, config))
    }

    fn wire(store: SqliteNoteStore, config: &CoreConfig) -> Self {
        let repository = Arc::new(NotesRepository::new(Arc::new(store)));
        let synchronizer =
            ViewStateSynchronizer::new(Arc::clone(&repository), config.release_grace());
        Self {
            repository,
            synchronizer,
        }
    }

    /// The repository mediating all note reads and writes.
    pub fn repository(&self) -> &Arc<NotesRepository> {
        &self.repository
    }

    /// The view-state synchronizer presentation code observes.
    pub fn synchronizer(&self) -> &ViewStateSynchronizer {
        &self.synchronizer
    }
}
