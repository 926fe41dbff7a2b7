//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, CacheSummary, ClearResponse, DeleteResponse, GetResponse, HealthResponse,
    ListCachesResponse, PruneResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::registry::{CacheRegistry, JsonCache};

/// Application state shared across all handlers.
///
/// Each cache synchronizes internally, so the registry itself is read-only
/// once built.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CacheRegistry>,
}

impl AppState {
    pub fn new(registry: CacheRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Creates a new AppState from configuration, loading persisted caches.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheRegistry::from_config(config))
    }

    fn cache(&self, name: &str) -> Result<Arc<JsonCache>> {
        self.registry
            .get(name)
            .ok_or_else(|| CacheError::UnknownCache(name.to_string()))
    }
}

fn checked_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(error_msg) => Err(CacheError::InvalidRequest(error_msg)),
        None => Ok(()),
    }
}

/// Handler for GET /caches
pub async fn list_handler(State(state): State<AppState>) -> Json<ListCachesResponse> {
    let caches = state
        .registry
        .iter()
        .map(|(name, cache)| CacheSummary {
            name: name.to_string(),
            ttl_seconds: cache.ttl().as_secs(),
            persistent: cache.is_persistent(),
            stats: cache.stats().into(),
        })
        .collect();

    Json(ListCachesResponse { caches })
}

/// Handler for GET /caches/:name/stats
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let cache = state.cache(&name)?;
    Ok(Json(cache.stats().into()))
}

/// Handler for GET /caches/:name/keys/:key
///
/// Absent and expired keys are both reported as not found.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let cache = state.cache(&name)?;
    checked_key(&key)?;

    let value = cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(name, key, value)))
}

/// Handler for PUT /caches/:name/keys/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let cache = state.cache(&name)?;
    checked_key(&key)?;

    cache.set(key.clone(), req.value);

    Ok(Json(SetResponse::new(&name, key)))
}

/// Handler for DELETE /caches/:name/keys/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let cache = state.cache(&name)?;
    checked_key(&key)?;

    cache
        .remove(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(DeleteResponse::new(&name, key)))
}

/// Handler for DELETE /caches/:name
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClearResponse>> {
    state.cache(&name)?.clear();
    Ok(Json(ClearResponse::new(name)))
}

/// Handler for POST /caches/:name/prune
pub async fn prune_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PruneResponse>> {
    let removed = state.cache(&name)?.prune_expired();
    Ok(Json(PruneResponse {
        cache: name,
        removed,
    }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
