//! Schema registry and destructive-recreate executor.
//!
//! # Responsibility
//! - Apply the single versioned `notes` schema.
//! - Recreate the store from scratch on any version mismatch.
//!
//! # Invariants
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Recreation drops note data; there is deliberately no upgrade path.

use crate::db::DbResult;
use log::warn;
use rusqlite::Connection;

/// The only schema version this binary understands.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("notes_schema.sql");

/// Ensures the connection carries the current schema.
///
/// A fresh database gets the schema applied. A database at [`SCHEMA_VERSION`]
/// is left untouched. Any other version, older or newer, is destructively
/// recreated: the `notes` table is dropped and the schema reapplied.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    if current_version != 0 {
        warn!(
            "event=db_schema_reset module=db status=start found_version={current_version} target_version={SCHEMA_VERSION}"
        );
    }

    let tx = conn.transaction()?;
    if current_version != 0 {
        tx.execute_batch("DROP TABLE IF EXISTS notes;")?;
    }
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
