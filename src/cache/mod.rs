//! Cache Module
//!
//! Provides a process-local TTL cache with optional best-effort persistence.

mod clock;
mod entry;
pub mod persist;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, MockClock, SystemClock};
pub use entry::CacheEntry;
pub use persist::{JsonFile, PersistError, Persistence};
pub use stats::CacheStats;
pub use store::TtlCache;
