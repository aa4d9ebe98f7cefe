//! Debounced persistence scheduling.
//!
//! # Responsibility
//! - Track at most one pending write keyed by data version.
//! - Restart the quiet-period timer on every new schedule.
//!
//! # Invariants
//! - Scheduling replaces any pending write (last write wins).
//! - A due write is handed out exactly once.

use std::time::{Duration, Instant};

/// Default quiet period before the week list is written.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(1000);

/// Write scheduled for one data version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWrite {
    pub version: u64,
    pub due_at: Instant,
}

/// Cancel-and-restart timer for storage writes.
#[derive(Debug, Clone)]
pub struct PersistDebouncer {
    delay: Duration,
    pending: Option<PendingWrite>,
}

impl PersistDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pending(&self) -> Option<PendingWrite> {
        self.pending
    }

    /// Schedules `version` for `now + delay`, returning the replaced write.
    pub fn schedule(&mut self, version: u64, now: Instant) -> Option<PendingWrite> {
        self.pending.replace(PendingWrite {
            version,
            due_at: now + self.delay,
        })
    }

    /// Drops the pending write without running it.
    pub fn cancel(&mut self) -> Option<PendingWrite> {
        self.pending.take()
    }

    /// Takes the pending version when its quiet period has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<u64> {
        match self.pending {
            Some(pending) if now >= pending.due_at => {
                self.pending = None;
                Some(pending.version)
            }
            _ => None,
        }
    }

    /// Takes the pending version regardless of its due time.
    pub fn take_pending(&mut self) -> Option<u64> {
        self.pending.take().map(|pending| pending.version)
    }
}

impl Default for PersistDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DELAY)
    }
}
