//! Configuration Module
//!
//! Handles loading the service configuration and per-cache settings from
//! environment variables.

use std::env;
use std::path::PathBuf;

/// Named caches hosted by default, with their TTLs in seconds.
///
/// One per upstream data source of the dashboard.
pub const DEFAULT_CACHES: &[(&str, u64)] = &[
    ("feeds", 600),
    ("weather", 900),
    ("nws", 300),
    ("aqi", 1800),
    ("civics", 600),
    ("legislation", 600),
    ("budget", 86_400),
];

// == Cache Config ==
/// Settings for a single cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Registry name, also used as the file stem
    pub name: String,
    /// Seconds an entry stays valid after insertion
    pub ttl_seconds: u64,
    /// Backing file; `None` keeps the cache in memory only
    pub filepath: Option<PathBuf>,
}

impl CacheConfig {
    /// Creates an in-memory cache configuration.
    pub fn in_memory(name: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            name: name.into(),
            ttl_seconds,
            filepath: None,
        }
    }

    /// Creates a configuration persisted at `<dir>/<name>.json`.
    pub fn in_dir(name: impl Into<String>, ttl_seconds: u64, dir: &std::path::Path) -> Self {
        let name = name.into();
        let filepath = dir.join(format!("{}.json", name));
        Self {
            name,
            ttl_seconds,
            filepath: Some(filepath),
        }
    }
}

// == Config ==
/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Directory holding one JSON file per persistent cache
    pub cache_dir: PathBuf,
    /// Whether caches are persisted to `cache_dir`
    pub persist: bool,
    /// Caches to host
    pub caches: Vec<CacheConfig>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DIR` - Directory for cache files (default: `.cache`)
    /// - `CACHE_PERSIST` - `1`/`true`/`yes`/`on` to persist caches (default: true)
    /// - `CACHE_TTL_<NAME>_SECONDS` - TTL override per default cache, e.g.
    ///   `CACHE_TTL_FEEDS_SECONDS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Missing or unparseable values fall back to their defaults. A TTL of
    /// zero is treated as unparseable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = lookup("SERVER_PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(3000);
        let cache_dir = lookup("CACHE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".cache"));
        let persist = lookup("CACHE_PERSIST")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);

        let caches = DEFAULT_CACHES
            .iter()
            .map(|&(name, default_ttl)| {
                let ttl_seconds = lookup(&ttl_variable(name))
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .filter(|&ttl| ttl > 0)
                    .unwrap_or(default_ttl);
                if persist {
                    CacheConfig::in_dir(name, ttl_seconds, &cache_dir)
                } else {
                    CacheConfig::in_memory(name, ttl_seconds)
                }
            })
            .collect();

        Self {
            server_port,
            cache_dir,
            persist,
            caches,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Name of the TTL override variable for a cache.
fn ttl_variable(name: &str) -> String {
    format!("CACHE_TTL_{}_SECONDS", name.to_uppercase())
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
