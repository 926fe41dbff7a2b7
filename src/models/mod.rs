//! Request and Response models for the cache service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_key, SetRequest, MAX_KEY_LENGTH};
pub use responses::{
    CacheSummary, ClearResponse, DeleteResponse, ErrorResponse, GetResponse, HealthResponse,
    ListCachesResponse, PruneResponse, SetResponse, StatsResponse,
};
