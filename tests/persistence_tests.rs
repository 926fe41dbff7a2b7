//! Integration Tests for Cache Persistence
//!
//! Exercises the public cache API against real files on disk.

use std::fs;
use std::time::Duration;

use civic_cache::cache::{MockClock, TtlCache};
use civic_cache::CacheConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Forecast {
    period: String,
    temperature: i32,
    short_forecast: String,
}

fn forecast() -> Vec<Forecast> {
    vec![
        Forecast {
            period: "Tonight".to_string(),
            temperature: 48,
            short_forecast: "Mostly Clear".to_string(),
        },
        Forecast {
            period: "Saturday".to_string(),
            temperature: 63,
            short_forecast: "Sunny".to_string(),
        },
    ]
}

#[test]
fn test_round_trip_across_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("feeds.json");

    {
        let cache: TtlCache<Value> = TtlCache::persistent(Duration::from_secs(600), &path);
        cache.set("k", json!({"a": 1}));
    }

    let reloaded: TtlCache<Value> = TtlCache::persistent(Duration::from_secs(600), &path);
    assert_eq!(reloaded.get("k"), Some(json!({"a": 1})));
}

#[test]
fn test_typed_values_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("weather.json");

    TtlCache::persistent(Duration::from_secs(900), &path).set("nws_forecast:41.3,-72.9", forecast());

    let reloaded: TtlCache<Vec<Forecast>> = TtlCache::persistent(Duration::from_secs(900), &path);
    assert_eq!(reloaded.get("nws_forecast:41.3,-72.9"), Some(forecast()));
}

#[test]
fn test_expired_entries_not_resurrected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("aqi.json");
    let ttl = Duration::from_secs(1800);
    let clock = MockClock::new();

    let cache: TtlCache<Value, MockClock> = TtlCache::with_persistence(
        ttl,
        Box::new(civic_cache::cache::JsonFile::new(&path)),
        clock.clone(),
    );
    cache.set("aqi:41.3083,-72.9279", json!(42));
    drop(cache);

    clock.advance(ttl + Duration::from_secs(1));
    let reloaded: TtlCache<Value, MockClock> = TtlCache::with_persistence(
        ttl,
        Box::new(civic_cache::cache::JsonFile::new(&path)),
        clock.clone(),
    );

    assert!(reloaded.is_empty());
    assert_eq!(reloaded.get("aqi:41.3083,-72.9279"), None);
}

#[test]
fn test_schema_mismatch_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("budget.json");

    // Written as strings, read back as integers
    TtlCache::persistent(Duration::from_secs(60), &path).set("k", "not a number".to_string());

    let cache: TtlCache<i64> = TtlCache::persistent(Duration::from_secs(60), &path);
    assert!(cache.is_empty());
    assert_eq!(cache.get("k"), None);
}

#[test]
fn test_garbage_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("civics.json");
    fs::write(&path, "<html>502 Bad Gateway</html>").unwrap();

    let cache: TtlCache<Value> = TtlCache::persistent(Duration::from_secs(60), &path);
    assert!(cache.is_empty());
}

#[test]
fn test_clear_wipes_memory_and_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legislation.json");
    let cache: TtlCache<Value> = TtlCache::persistent(Duration::from_secs(600), &path);

    cache.set("k", json!(1));
    assert!(path.exists());

    cache.clear();
    assert_eq!(cache.get("k"), None);
    assert!(!path.exists());

    let reloaded: TtlCache<Value> = TtlCache::persistent(Duration::from_secs(600), &path);
    assert!(reloaded.is_empty());
}

#[test]
fn test_unwritable_location_does_not_fail_set() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "").unwrap();

    // The parent "directory" is a regular file, so every save fails
    let cache: TtlCache<Value> = TtlCache::persistent(Duration::from_secs(60), blocker.join("cache.json"));
    cache.set("k", json!("still cached"));

    assert_eq!(cache.get("k"), Some(json!("still cached")));
    assert_eq!(cache.stats().persist_failures, 1);
}

#[test]
fn test_from_config_in_memory_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let cache: TtlCache<Value> = TtlCache::from_config(&CacheConfig::in_memory("nws", 300));

    cache.set("nws_alerts:ctz010", json!([]));

    assert!(!cache.is_persistent());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
