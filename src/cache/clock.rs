//! Clock Module
//!
//! Time source used for entry timestamps and expiry checks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

// == Clock Trait ==
/// Source of the current wall-clock time in Unix milliseconds.
///
/// Wall time (rather than a monotonic instant) is required because entry
/// timestamps are persisted and compared again after a process restart.
pub trait Clock: Send + Sync {
    /// Returns the current time as Unix milliseconds.
    fn now_ms(&self) -> u64;
}

// == System Clock ==
/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Pre-epoch clocks clamp to zero
        Utc::now().timestamp_millis().max(0) as u64
    }
}

// == Mock Clock ==
/// Manually driven clock for simulating expiry without sleeping.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to the cache.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<AtomicU64>,
}

impl MockClock {
    /// Arbitrary fixed starting point (2023-11-14T22:13:20Z).
    pub const START_MS: u64 = 1_700_000_000_000;

    /// Creates a mock clock starting at [`MockClock::START_MS`].
    pub fn new() -> Self {
        Self::at_ms(Self::START_MS)
    }

    /// Creates a mock clock starting at the given Unix milliseconds.
    pub fn at_ms(now_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now_ms)),
        }
    }

    /// Moves time forward.
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Sets the absolute time, which may move backwards.
    pub fn set_ms(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
