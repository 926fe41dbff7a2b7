//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and their liveness rule.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A stored value together with the time it was inserted.
///
/// This is also the on-disk shape of each entry: `{"inserted_at": ms, "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// Insertion timestamp (Unix milliseconds)
    pub inserted_at: u64,
    /// The stored value
    pub value: V,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with `now_ms`.
    pub fn new(value: V, now_ms: u64) -> Self {
        Self {
            inserted_at: now_ms,
            value,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since insertion.
    ///
    /// An insertion time in the future (clock stepped backwards) counts as age zero.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.inserted_at)
    }

    // == Is Live ==
    /// Checks whether the entry is still valid.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is still
    /// live. It expires only once the age is strictly greater than the TTL.
    pub fn is_live(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.age_ms(now_ms) <= ttl_ms
    }

    /// Inverse of [`CacheEntry::is_live`].
    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        !self.is_live(now_ms, ttl_ms)
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64, ttl_ms: u64) -> u64 {
        ttl_ms.saturating_sub(self.age_ms(now_ms))
    }
}
