//! Core runtime configuration.
//!
//! # Responsibility
//! - Carry the knobs the composition root needs to wire the pipeline.
//!
//! # Invariants
//! - Defaults are usable as-is: a relative db file next to the process and a
//!   five second release grace, matching shipped behavior.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DB_FILE: &str = "plainnote.sqlite3";
const DEFAULT_RELEASE_GRACE_MS: u64 = 5_000;

/// Configuration for the notes core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Database file location.
    pub db_path: PathBuf,
    /// Log level passed to [`crate::logging::init_logging`]; `None` uses the
    /// build-mode default.
    pub log_level: Option<String>,
    /// Log directory; logging stays uninitialized when absent.
    pub log_dir: Option<PathBuf>,
    /// How long the synchronizer keeps its store subscription alive after the
    /// last observer detaches.
    pub release_grace_ms: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_level: None,
            log_dir: None,
            release_grace_ms: DEFAULT_RELEASE_GRACE_MS,
        }
    }
}

impl CoreConfig {
    /// Release grace window as a duration.
    pub fn release_grace(&self) -> Duration {
        Duration::from_millis(self.release_grace_ms)
    }
}
