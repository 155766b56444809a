//! Domain model for the notes pipeline.
//!
//! # Responsibility
//! - Define the canonical persisted record and its lifecycle helpers.
//!
//! # Invariants
//! - Every persisted object is identified by a stable store-assigned `NoteId`.
//! - Deletion removes records permanently; there are no tombstones.

pub mod note;
