//! Versioned latest-value cell with blocking change waits.
//!
//! # Responsibility
//! - Hold the single most recent value for any number of readers.
//! - Wake blocked readers whenever a newer version is published.
//!
//! # Invariants
//! - Versions are strictly increasing; readers never observe a rollback.
//! - Readers always get the latest value, never an intermediate history.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct Slot<T> {
    version: u64,
    value: T,
}

/// Broadcast-latest cell: one writer side, many polling/waiting readers.
pub(crate) struct Latest<T> {
    slot: Mutex<Slot<T>>,
    changed: Condvar,
}

impl<T: Clone> Latest<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Mutex::new(Slot { version: 0, value }),
            changed: Condvar::new(),
        }
    }

    /// Mutates the value through a closure; when the closure reports a
    /// change, bumps the version and wakes all waiting readers.
    ///
    /// The closure runs under the slot lock, so read-modify-write sequences
    /// (such as selection reconciliation) are atomic.
    pub fn update(&self, mutate: impl FnOnce(&mut T) -> bool) -> u64 {
        let mut slot = self.lock_slot();
        if mutate(&mut slot.value) {
            slot.version += 1;
            self.changed.notify_all();
        }
        slot.version
    }

    /// Returns the current version together with a copy of the value.
    pub fn get(&self) -> (u64, T) {
        let slot = self.lock_slot();
        (slot.version, slot.value.clone())
    }

    /// Blocks until a version newer than `seen` is published or the timeout
    /// elapses. Returns `None` on timeout.
    pub fn wait_newer(&self, seen: u64, timeout: Duration) -> Option<(u64, T)> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.lock_slot();

        while slot.version <= seen {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let (next, wait) = self
                .changed
                .wait_timeout(slot, remaining)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            slot = next;
            if wait.timed_out() && slot.version <= seen {
                return None;
            }
        }

        Some((slot.version, slot.value.clone()))
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::Latest;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn get_returns_latest_published_value() {
        let cell = Latest::new(0u32);
        cell.update(|value| {
            *value = 5;
            true
        });
        cell.update(|value| {
            *value = 9;
            true
        });

        let (version, value) = cell.get();
        assert_eq!(version, 2);
        assert_eq!(value, 9);
    }

    #[test]
    fn unchanged_update_keeps_version() {
        let cell = Latest::new(0u32);
        assert_eq!(cell.update(|_| false), 0);
        assert_eq!(cell.get().0, 0);
    }

    #[test]
    fn wait_newer_times_out_without_publish() {
        let cell = Latest::new(0u32);
        let (version, _) = cell.get();
        assert!(cell.wait_newer(version, Duration::from_millis(50)).is_none());
    }

    #[test]
    fn wait_newer_wakes_on_publish() {
        let cell = Arc::new(Latest::new(0u32));
        let waiter = Arc::clone(&cell);
        let handle = thread::spawn(move || waiter.wait_newer(0, Duration::from_secs(5)));

        thread::sleep(Duration::from_millis(20));
        cell.update(|value| {
            *value = 3;
            true
        });

        let woken = handle.join().expect("waiter thread panicked");
        assert_eq!(woken, Some((1, 3)));
    }
}
