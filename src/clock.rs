//! Time sources for stamping transactions and expiring cached responses.

use std::{
    fmt::Debug,
    sync::{Mutex, MutexGuard},
};

use time::{Duration, OffsetDateTime};

/// Supplies the current time.
///
/// The store and the idempotency cache read the time through this trait so
/// that tests can control it.
pub trait Clock: Debug + Send + Sync {
    /// The current UTC time.
    fn now(&self) -> OffsetDateTime;
}

/// A [Clock] backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A [Clock] that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        *self.lock() += duration;
    }

    // A panic while holding the lock cannot leave the time half-written.
    fn lock(&self) -> MutexGuard<'_, OffsetDateTime> {
        self.now
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.lock()
    }
}
