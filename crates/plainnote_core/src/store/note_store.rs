//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable CRUD over the `notes` table.
//! - Push a full immutable snapshot to every subscriber after each
//!   state-changing write.
//!
//! # Invariants
//! - Ids are store-assigned and never reused for another note.
//! - `timestamp` is stamped at write time for both insert and update.
//! - Write, snapshot read and publish happen under one connection lock, so
//!   subscribers observe snapshots in write linearization order.
//! - Delete is idempotent; deleting an absent id succeeds and emits nothing.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const NOTE_SELECT_SQL: &str = "SELECT id, title, content, timestamp
     FROM notes
     ORDER BY id ASC;";

pub type StoreResult<T> = Result<T, StoreError>;

/// Immutable point-in-time view of the full note collection.
pub type NotesSnapshot = Arc<Vec<Note>>;

/// Live snapshot stream handle returned by [`NoteStore::subscribe`].
///
/// The current collection is delivered immediately on subscribe; one further
/// snapshot follows every successful mutation. Dropping the receiver detaches
/// the subscriber.
pub type NotesWatch = Receiver<NotesSnapshot>;

/// Store error taxonomy for note persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying medium unreachable, corrupt or full. Not retried.
    Storage(DbError),
    /// Update targeted an id with no persisted record (stale reference).
    NotFound(NoteId),
    /// Persisted row failed to decode; rejected instead of masked.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Store interface for durable note CRUD and live snapshots.
pub trait NoteStore: Send + Sync {
    /// Persists a new note and returns its store-assigned id.
    ///
    /// Any id carried by the draft is ignored; the store always assigns a
    /// fresh one and stamps `timestamp` with the write time.
    fn insert(&self, note: &Note) -> StoreResult<NoteId>;

    /// Overwrites title and content of an existing note and re-stamps
    /// `timestamp`. Fails with [`StoreError::NotFound`] for unknown ids.
    fn update(&self, note: &Note) -> StoreResult<()>;

    /// Removes a note permanently. Succeeds silently when the id is absent.
    fn delete(&self, id: NoteId) -> StoreResult<()>;

    /// Returns every persisted note in insertion (id) order.
    fn all(&self) -> StoreResult<Vec<Note>>;

    /// Registers a subscriber and immediately delivers the current snapshot.
    fn subscribe(&self) -> StoreResult<NotesWatch>;
}

/// SQLite-backed note store.
pub struct SqliteNoteStore {
    conn: Mutex<Connection>,
    subscribers: Mutex<Vec<Sender<NotesSnapshot>>>,
}

impl SqliteNoteStore {
    /// Opens (or creates) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::with_connection(crate::db::open_db(path)?))
    }

    /// Opens an in-memory store, mainly for tests and smoke probes.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::with_connection(crate::db::open_db_in_memory()?))
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reads the current collection and pushes it to every live subscriber.
    ///
    /// Must be called while holding the connection lock; that lock is what
    /// keeps snapshot order equal to write order across concurrent writers.
    fn publish_locked(&self, conn: &Connection) -> StoreResult<()> {
        let snapshot: NotesSnapshot = Arc::new(load_all(conn)?);
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.retain(|subscriber| subscriber.send(Arc::clone(&snapshot)).is_ok());
        Ok(())
    }
}

impl NoteStore for SqliteNoteStore {
    fn insert(&self, note: &Note) -> StoreResult<NoteId> {
        let started_at = Instant::now();
        let conn = self.lock_conn();

        let result = (|| {
            conn.execute(
                "INSERT INTO notes (title, content, timestamp) VALUES (?1, ?2, ?3);",
                params![note.title, note.content, now_epoch_ms()],
            )?;
            let id = conn.last_insert_rowid();
            self.publish_locked(&conn)?;
            Ok(id)
        })();

        match &result {
            Ok(id) => info!(
                "event=note_insert module=store status=ok id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=note_insert module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }

    fn update(&self, note: &Note) -> StoreResult<()> {
        let started_at = Instant::now();
        let conn = self.lock_conn();

        let result = (|| {
            let changed = conn.execute(
                "UPDATE notes SET title = ?1, content = ?2, timestamp = ?3 WHERE id = ?4;",
                params![note.title, note.content, now_epoch_ms(), note.id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(note.id));
            }
            self.publish_locked(&conn)
        })();

        match &result {
            Ok(()) => info!(
                "event=note_update module=store status=ok id={} duration_ms={}",
                note.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=note_update module=store status=error id={} duration_ms={} error={}",
                note.id,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }

    fn delete(&self, id: NoteId) -> StoreResult<()> {
        let started_at = Instant::now();
        let conn = self.lock_conn();

        let result = (|| {
            let changed = conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
            // Idempotent: an absent id changes nothing, so nothing is emitted.
            if changed > 0 {
                self.publish_locked(&conn)?;
            }
            Ok(changed > 0)
        })();

        match &result {
            Ok(removed) => info!(
                "event=note_delete module=store status=ok id={} removed={} duration_ms={}",
                id,
                removed,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=note_delete module=store status=error id={} duration_ms={} error={}",
                id,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result.map(|_| ())
    }

    fn all(&self) -> StoreResult<Vec<Note>> {
        let conn = self.lock_conn();
        load_all(&conn)
    }

    fn subscribe(&self) -> StoreResult<NotesWatch> {
        let conn = self.lock_conn();
        let snapshot: NotesSnapshot = Arc::new(load_all(&conn)?);

        let (tx, rx) = unbounded();
        // The receiver is still in hand, so this send cannot fail.
        let _ = tx.send(snapshot);
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tx);

        info!("event=store_subscribe module=store status=ok");
        Ok(rx)
    }
}

fn load_all(conn: &Connection) -> StoreResult<Vec<Note>> {
    let mut stmt = conn.prepare(NOTE_SELECT_SQL)?;
    let mut rows = stmt.query([])?;
    let mut notes = Vec::new();

    while let Some(row) = rows.next()? {
        notes.push(parse_note_row(row)?);
    }

    Ok(notes)
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<Note> {
    let id: NoteId = row.get("id")?;
    if id <= 0 {
        return Err(StoreError::InvalidData(format!(
            "invalid id value `{id}` in notes.id"
        )));
    }

    Ok(Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        timestamp: row.get("timestamp")?,
    })
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
