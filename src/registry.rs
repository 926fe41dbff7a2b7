//! Cache Registry
//!
//! Explicitly constructed set of named caches, one per data source, shared
//! by handle with whatever needs them.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::cache::TtlCache;
use crate::config::{CacheConfig, Config};

/// Cache holding arbitrary JSON documents.
pub type JsonCache = TtlCache<Value>;

/// Named caches keyed by name, iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct CacheRegistry {
    caches: BTreeMap<String, Arc<JsonCache>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every cache listed in the configuration.
    ///
    /// Persistent caches load their files here; unreadable files only
    /// produce a warning.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for cache in &config.caches {
            registry.insert_config(cache);
        }
        registry
    }

    /// Builds and registers one cache, replacing any cache with the same name.
    pub fn insert_config(&mut self, config: &CacheConfig) -> Arc<JsonCache> {
        let cache = Arc::new(JsonCache::from_config(config));
        info!(
            "Cache '{}' ready: ttl={}s, entries={}, file={}",
            config.name,
            config.ttl_seconds,
            cache.len(),
            config
                .filepath
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        self.insert(config.name.clone(), cache.clone());
        cache
    }

    /// Registers an already constructed cache.
    pub fn insert(&mut self, name: impl Into<String>, cache: Arc<JsonCache>) {
        self.caches.insert(name.into(), cache);
    }

    pub fn get(&self, name: &str) -> Option<Arc<JsonCache>> {
        self.caches.get(name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<JsonCache>)> {
        self.caches.iter().map(|(name, cache)| (name.as_str(), cache))
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_registry_from_config() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            server_port: 0,
            cache_dir: dir.path().to_path_buf(),
            persist: true,
            caches: vec![
                CacheConfig::in_dir("feeds", 600, dir.path()),
                CacheConfig::in_memory("nws", 300),
            ],
        };

        let registry = CacheRegistry::from_config(&config);

        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["feeds", "nws"]);

        let feeds = registry.get("feeds").unwrap();
        assert!(feeds.is_persistent());
        assert_eq!(feeds.ttl(), Duration::from_secs(600));
        assert!(!registry.get("nws").unwrap().is_persistent());
        assert!(registry.get("tides").is_none());
    }

    #[test]
    fn test_registry_handles_share_state() {
        let mut registry = CacheRegistry::new();
        let cache = registry.insert_config(&CacheConfig::in_memory("civics", 600));

        cache.set("civics:tax:new-haven", json!({"mill_rate": 39.88}));

        let again = registry.get("civics").unwrap();
        assert_eq!(again.get("civics:tax:new-haven"), Some(json!({"mill_rate": 39.88})));
    }

    #[test]
    fn test_registry_reloads_persisted_caches() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            server_port: 0,
            cache_dir: dir.path().to_path_buf(),
            persist: true,
            caches: vec![CacheConfig::in_dir("budget", 86_400, dir.path())],
        };

        CacheRegistry::from_config(&config)
            .get("budget")
            .unwrap()
            .set("budget:summary", json!({"total": 1}));

        let restarted = CacheRegistry::from_config(&config);
        assert_eq!(
            restarted.get("budget").unwrap().get("budget:summary"),
            Some(json!({"total": 1}))
        );
    }
}
