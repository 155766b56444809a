//! View-state synchronization between the store stream and observers.
//!
//! # Responsibility
//! - Derive the presentation snapshot (note list + optional selection) from
//!   the repository's live stream.
//! - Own selection state independently of any single observer's lifecycle.
//!
//! # Invariants
//! - Observers see a broadcast of the latest state, never a queue of
//!   historical states.
//! - The repository subscription survives observer churn for a grace window
//!   before it is released.

mod latest;
pub mod synchronizer;

pub use synchronizer::{ViewObservation, ViewSnapshot, ViewStateSynchronizer};
