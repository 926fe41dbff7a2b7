//! Civic Cache - TTL caching for dashboard data sources
//!
//! Provides a process-local cache with per-entry expiry and best-effort file
//! persistence, a registry of named caches, and an HTTP service to inspect them.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;

pub use api::AppState;
pub use cache::TtlCache;
pub use config::{CacheConfig, Config};
pub use registry::CacheRegistry;
