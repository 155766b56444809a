//! View-state synchronizer over the repository's live stream.
//!
//! # Responsibility
//! - Pump store snapshots into a broadcast-latest presentation snapshot.
//! - Track the optional selected note across observer lifecycles.
//! - Keep the store subscription alive through transient observer teardown.
//!
//! # Invariants
//! - A selection never outlives its note: a snapshot that no longer contains
//!   the selected id clears it.
//! - Lifecycle: Unsubscribed -> Active (first observer) -> GracePeriod (last
//!   observer drops) -> Unsubscribed, unless a new observer arrives during
//!   the grace window and cancels the teardown.

use crate::model::note::{Note, NoteId};
use crate::repo::notes_repo::NotesRepository;
use crate::store::note_store::{NotesSnapshot, NotesWatch, StoreResult};
use crate::view::latest::Latest;
use crossbeam_channel::{bounded, select, Receiver, Sender};
use log::info;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Combined presentation snapshot delivered to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// All current notes in insertion order.
    pub notes: Arc<Vec<Note>>,
    /// Currently selected note, copied by value. Selection does not keep a
    /// note alive once it is deleted from the store.
    pub selected: Option<Note>,
}

struct Lifecycle {
    observers: usize,
    /// Bumped on every attach; a pending grace teardown only fires when the
    /// epoch it captured is still current.
    epoch: u64,
    pump: Option<PumpHandle>,
}

struct PumpHandle {
    stop_tx: Sender<()>,
    _thread: thread::JoinHandle<()>,
}

struct ViewShared {
    latest: Latest<ViewSnapshot>,
    lifecycle: Mutex<Lifecycle>,
    release_grace: Duration,
}

impl ViewShared {
    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Folds a store emission into the view snapshot, reconciling selection:
    /// a vanished id clears it, a surviving id picks up the new field values.
    fn apply_store_snapshot(&self, notes: NotesSnapshot) {
        self.latest.update(|view| {
            view.selected = view
                .selected
                .take()
                .and_then(|selected| notes.iter().find(|note| note.id == selected.id).cloned());
            view.notes = notes;
            true
        });
    }
}

fn detach_observer(shared: &Arc<ViewShared>) {
    let mut lifecycle = shared.lock_lifecycle();
    lifecycle.observers = lifecycle.observers.saturating_sub(1);
    if lifecycle.observers > 0 || lifecycle.pump.is_none() {
        return;
    }

    info!(
        "event=view_grace module=view status=start grace_ms={}",
        shared.release_grace.as_millis()
    );
    let epoch = lifecycle.epoch;
    let shared = Arc::clone(shared);
    thread::spawn(move || {
        thread::sleep(shared.release_grace);
        let mut lifecycle = shared.lock_lifecycle();
        if lifecycle.observers == 0 && lifecycle.epoch == epoch {
            if let Some(pump) = lifecycle.pump.take() {
                let _ = pump.stop_tx.send(());
                info!("event=view_release module=view status=ok");
            }
        }
    });
}

/// Bridges the repository's live stream to observers of [`ViewSnapshot`].
pub struct ViewStateSynchronizer {
    repo: Arc<NotesRepository>,
    shared: Arc<ViewShared>,
}

impl ViewStateSynchronizer {
    /// Creates a synchronizer that releases its store subscription after
    /// `release_grace` once the last observer detaches.
    pub fn new(repo: Arc<NotesRepository>, release_grace: Duration) -> Self {
        Self {
            repo,
            shared: Arc::new(ViewShared {
                latest: Latest::new(ViewSnapshot::default()),
                lifecycle: Mutex::new(Lifecycle {
                    observers: 0,
                    epoch: 0,
                    pump: None,
                }),
                release_grace,
            }),
        }
    }

    /// Attaches an observer.
    ///
    /// The first observer subscribes to the repository stream; the store's
    /// immediate emission seeds the snapshot, so no mutation is needed before
    /// the current collection becomes visible. An observer attaching during
    /// the grace window cancels the pending teardown. Late observers read the
    /// latest state right away.
    pub fn observe(&self) -> StoreResult<ViewObservation> {
        let mut lifecycle = self.shared.lock_lifecycle();
        lifecycle.epoch += 1;

        if lifecycle.pump.is_none() {
            let updates = self.repo.all_notes_stream()?;
            let (stop_tx, stop_rx) = bounded(1);
            let shared = Arc::clone(&self.shared);
            let handle = thread::spawn(move || pump_loop(shared, updates, stop_rx));
            lifecycle.pump = Some(PumpHandle {
                stop_tx,
                _thread: handle,
            });
            info!("event=view_attach module=view status=ok stream=started");
        } else {
            info!("event=view_attach module=view status=ok stream=reused");
        }

        lifecycle.observers += 1;
        drop(lifecycle);

        Ok(ViewObservation {
            shared: Arc::clone(&self.shared),
        })
    }

    /// Whether the repository subscription is currently live (Active or
    /// GracePeriod in the lifecycle).
    pub fn is_streaming(&self) -> bool {
        self.shared.lock_lifecycle().pump.is_some()
    }

    /// Marks a note as the current selection.
    pub fn select_note(&self, note: &Note) {
        let selected = note.clone();
        self.shared.latest.update(|view| {
            view.selected = Some(selected);
            true
        });
    }

    /// Clears the current selection.
    pub fn clear_selection(&self) {
        self.shared
            .latest
            .update(|view| view.selected.take().is_some());
    }

    /// Persists a new note built from raw field values.
    pub fn add_note(&self, title: impl Into<String>, content: impl Into<String>) -> StoreResult<NoteId> {
        let draft = Note::draft(title, content);
        self.repo.insert_note(&draft)
    }

    /// Updates a persisted note; a matching selection picks up the new field
    /// values immediately, without waiting for the pump.
    pub fn edit_note(&self, note: &Note) -> StoreResult<()> {
        self.repo.update_note(note)?;
        let edited = note.clone();
        self.shared.latest.update(|view| match view.selected.as_mut() {
            Some(selected) if selected.id == edited.id => {
                *selected = edited;
                true
            }
            _ => false,
        });
        Ok(())
    }

    /// Deletes a note; a matching selection is cleared immediately.
    pub fn delete_note(&self, id: NoteId) -> StoreResult<()> {
        self.repo.delete_note(id)?;
        self.shared.latest.update(|view| {
            if view.selected.as_ref().is_some_and(|selected| selected.id == id) {
                view.selected = None;
                true
            } else {
                false
            }
        });
        Ok(())
    }
}

/// RAII observer handle; dropping it detaches the observer and, when it was
/// the last one, starts the grace-window teardown.
pub struct ViewObservation {
    shared: Arc<ViewShared>,
}

impl ViewObservation {
    /// Returns the current snapshot version and value.
    pub fn snapshot(&self) -> (u64, ViewSnapshot) {
        self.shared.latest.get()
    }

    /// Blocks until a snapshot newer than `seen` is published or the timeout
    /// elapses.
    pub fn wait_newer(&self, seen: u64, timeout: Duration) -> Option<(u64, ViewSnapshot)> {
        self.shared.latest.wait_newer(seen, timeout)
    }
}

impl Drop for ViewObservation {
    fn drop(&mut self) {
        detach_observer(&self.shared);
    }
}

fn pump_loop(shared: Arc<ViewShared>, updates: NotesWatch, stop_rx: Receiver<()>) {
    loop {
        select! {
            recv(updates) -> message => match message {
                Ok(snapshot) => shared.apply_store_snapshot(snapshot),
                Err(_) => {
                    // Store side went away; nothing further will be emitted.
                    shared.lock_lifecycle().pump.take();
                    break;
                }
            },
            recv(stop_rx) -> _ => break,
        }
    }
}
