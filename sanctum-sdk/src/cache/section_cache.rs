//! TTL cache for fetched section record lists
//!
//! Keys are the `section` or `section-subsection` strings the loader
//! derives. Entries expire after one configured TTL; expired entries are
//! dropped lazily on read and by the periodic cleanup sweep. All
//! operations are O(1) on DashMap; stats sweep without evicting.

use dashmap::DashMap;
use sanctum_client::ContentRecord;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default TTL for cached sections
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a cached section stays fresh
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl CacheConfig {
    /// Default config with an optional `SANCTUM_CACHE_TTL_MS` override
    pub fn from_env() -> Self {
        let ttl = std::env::var("SANCTUM_CACHE_TTL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TTL);
        Self { ttl }
    }
}

struct CacheEntry {
    records: Vec<ContentRecord>,
    expires_at: Instant,
}

/// Counters and a non-evicting freshness sweep
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Entries currently held, fresh or not
    pub total_cached: usize,
    /// Entries past their TTL (still held until read or cleanup)
    pub expired: usize,
    /// Entries still fresh
    pub valid: usize,
    /// Reads served from cache
    pub hits: u64,
    /// Reads that went to the source
    pub misses: u64,
}

/// TTL cache for section record lists
///
/// Thread-safe; share it behind an `Arc` between the loader and the editor.
pub struct SectionCache {
    config: CacheConfig,
    entries: DashMap<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SectionCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache with the default TTL
    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    /// The configured TTL
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Get a cached section if still fresh. Expired entries are dropped.
    pub fn get(&self, key: &str) -> Option<Vec<ContentRecord>> {
        self.get_at(key, Instant::now())
    }

    /// Clock-injected variant of [`get`](Self::get)
    pub fn get_at(&self, key: &str, now: Instant) -> Option<Vec<ContentRecord>> {
        if let Some(entry) = self.entries.get(key) {
            if now < entry.expires_at {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.records.clone());
            }
        }

        // Missing or past TTL; drop whatever was there
        self.entries.remove(key);
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Cache a section's records
    pub fn insert(&self, key: &str, records: Vec<ContentRecord>) {
        self.insert_at(key, records, Instant::now());
    }

    /// Clock-injected variant of [`insert`](Self::insert)
    pub fn insert_at(&self, key: &str, records: Vec<ContentRecord>, now: Instant) {
        debug!(key = key, count = records.len(), "Section cached");
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                records,
                expires_at: now + self.config.ttl,
            },
        );
    }

    /// Drop one key. Returns true if an entry was held.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(key = key, "Section invalidated");
        }
        removed
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        let count = self.entries.len();
        self.entries.clear();
        info!(count = count, "Section cache cleared");
    }

    /// Sweep entry freshness without evicting anything
    pub fn stats(&self) -> CacheStats {
        self.stats_at(Instant::now())
    }

    /// Clock-injected variant of [`stats`](Self::stats)
    pub fn stats_at(&self, now: Instant) -> CacheStats {
        let total_cached = self.entries.len();
        let expired = self
            .entries
            .iter()
            .filter(|e| now >= e.expires_at)
            .count();

        CacheStats {
            total_cached,
            expired,
            valid: total_cached - expired,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Remove all expired entries. Returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Instant::now())
    }

    /// Clock-injected variant of [`cleanup_expired`](Self::cleanup_expired)
    pub fn cleanup_expired_at(&self, now: Instant) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|e| now >= e.expires_at)
            .map(|e| e.key().clone())
            .collect();

        let mut removed = 0;
        for key in &expired_keys {
            if self.entries.remove(key).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed = removed, "Cleaned up expired sections");
        }
        removed
    }
}

/// Spawn a background task to periodically drop expired sections
pub fn spawn_cleanup_task(cache: Arc<SectionCache>, interval: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let removed = cache.cleanup_expired();
            let stats = cache.stats();
            debug!(
                removed = removed,
                cached = stats.total_cached,
                "Section cache cleanup completed"
            );
        }
    });

    info!(
        interval_secs = interval.as_secs(),
        "Section cache cleanup task started"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, section: &str) -> ContentRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "section": section,
            "subsection": null,
            "contentType": "text",
            "content": "x",
            "order": 0,
            "isActive": true,
            "createdAt": "2025-01-01 00:00:00",
            "updatedAt": "2025-01-01 00:00:00",
        }))
        .unwrap()
    }

    #[test]
    fn fresh_entry_hits_until_ttl() {
        let cache = SectionCache::new(CacheConfig { ttl: Duration::from_secs(60) });
        let now = Instant::now();

        cache.insert_at("hero", vec![record("r1", "hero")], now);

        // Just inside the TTL
        let hit = cache.get_at("hero", now + Duration::from_secs(59));
        assert_eq!(hit.unwrap().len(), 1);

        // At the TTL boundary the entry is stale
        assert!(cache.get_at("hero", now + Duration::from_secs(60)).is_none());

        // The stale read dropped the entry
        assert_eq!(cache.stats_at(now).total_cached, 0);
    }

    #[test]
    fn stats_sweep_does_not_evict() {
        let cache = SectionCache::new(CacheConfig { ttl: Duration::from_secs(10) });
        let now = Instant::now();

        cache.insert_at("hero", vec![record("r1", "hero")], now);
        cache.insert_at("about", vec![record("r2", "about")], now + Duration::from_secs(8));

        let later = now + Duration::from_secs(12);
        let stats = cache.stats_at(later);
        assert_eq!(stats.total_cached, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.valid, 1);

        // Sweep left both entries in place
        let again = cache.stats_at(later);
        assert_eq!(again.total_cached, 2);
    }

    #[test]
    fn hit_and_miss_counters() {
        let cache = SectionCache::new(CacheConfig { ttl: Duration::from_secs(60) });
        let now = Instant::now();

        assert!(cache.get_at("hero", now).is_none());
        cache.insert_at("hero", vec![record("r1", "hero")], now);
        assert!(cache.get_at("hero", now).is_some());
        assert!(cache.get_at("hero", now).is_some());

        let stats = cache.stats_at(now);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn invalidate_drops_one_key() {
        let cache = SectionCache::with_defaults();
        cache.insert("hero", vec![record("r1", "hero")]);
        cache.insert("about", vec![record("r2", "about")]);

        assert!(cache.invalidate("hero"));
        assert!(!cache.invalidate("hero"));

        assert!(cache.get("hero").is_none());
        assert!(cache.get("about").is_some());
    }

    #[test]
    fn invalidate_all_clears_everything() {
        let cache = SectionCache::with_defaults();
        cache.insert("hero", vec![record("r1", "hero")]);
        cache.insert("about", vec![record("r2", "about")]);

        cache.invalidate_all();

        assert_eq!(cache.stats().total_cached, 0);
        assert!(cache.get("hero").is_none());
    }

    #[test]
    fn cleanup_removes_only_expired() {
        let cache = SectionCache::new(CacheConfig { ttl: Duration::from_secs(10) });
        let now = Instant::now();

        cache.insert_at("old", vec![record("r1", "old")], now);
        cache.insert_at("new", vec![record("r2", "new")], now + Duration::from_secs(8));

        let removed = cache.cleanup_expired_at(now + Duration::from_secs(12));
        assert_eq!(removed, 1);

        let stats = cache.stats_at(now + Duration::from_secs(12));
        assert_eq!(stats.total_cached, 1);
        assert_eq!(stats.valid, 1);
    }

    #[test]
    fn ttl_override_from_env_shape() {
        // from_env falls back to the default when the variable is absent
        std::env::remove_var("SANCTUM_CACHE_TTL_MS");
        let config = CacheConfig::from_env();
        assert_eq!(config.ttl, Duration::from_secs(300));
    }
}
