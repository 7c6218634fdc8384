//! In-memory cache for weather records.
//!
//! Uses `DashMap` so concurrent resolutions for different cities never
//! contend on a single lock. Expiry is checked lazily on read; there is no
//! background sweep.

use std::sync::Arc;
use std::time::Duration;

use common::{CityId, WeatherRecord};
use dashmap::DashMap;
use tokio::time::Instant;

/// How long a fetched record is served from cache.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// A cached record and the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub record: WeatherRecord,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe record cache keyed by city ID. Clones share the same map.
#[derive(Debug, Clone)]
pub struct WeatherCache {
    entries: Arc<DashMap<CityId, CacheEntry>>,
    ttl: Duration,
}

impl WeatherCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: CACHE_TTL,
        }
    }

    /// Return the cached record for `id` if it has not expired.
    pub fn get(&self, id: CityId) -> Option<WeatherRecord> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(&id) {
            if entry.is_fresh(now) {
                return Some(entry.record.clone());
            }
        }

        // Expired entries are dropped on the way out. A concurrent writer
        // may have replaced it already, so only remove if still stale.
        self.entries.remove_if(&id, |_, entry| !entry.is_fresh(now));
        None
    }

    /// Store `record` for `id`, replacing any previous entry.
    pub fn insert(&self, id: CityId, record: WeatherRecord) {
        let entry = CacheEntry {
            record,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.insert(id, entry);
    }

    /// Number of entries held, including expired ones not yet observed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::CurrentConditions;

    fn record(id: u64, temp_c: f64) -> WeatherRecord {
        WeatherRecord::from_conditions(
            CityId(id),
            &CurrentConditions {
                name: format!("City {}", id),
                description: "clear sky".into(),
                temp_c,
                icon: "01d".into(),
                humidity: 50,
                wind_speed: 2.0,
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl() {
        let cache = WeatherCache::new();
        cache.insert(CityId(1), record(1, 20.0));

        tokio::time::advance(Duration::from_secs(299)).await;

        assert_eq!(cache.get(CityId(1)), Some(record(1, 20.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_at_ttl_boundary() {
        let cache = WeatherCache::new();
        cache.insert(CityId(1), record(1, 20.0));

        tokio::time::advance(CACHE_TTL).await;

        assert_eq!(cache.get(CityId(1)), None);
        assert!(cache.is_empty(), "expired entry should be dropped on read");
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_replaces_and_restarts_ttl() {
        let cache = WeatherCache::new();
        cache.insert(CityId(1), record(1, 20.0));

        tokio::time::advance(Duration::from_secs(200)).await;
        cache.insert(CityId(1), record(1, 25.0));
        tokio::time::advance(Duration::from_secs(200)).await;

        assert_eq!(cache.get(CityId(1)), Some(record(1, 25.0)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_miss_on_unknown_id() {
        let cache = WeatherCache::new();
        assert_eq!(cache.get(CityId(42)), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = WeatherCache::new();
        let other = cache.clone();
        other.insert(CityId(3), record(3, 10.0));

        assert_eq!(cache.get(CityId(3)), Some(record(3, 10.0)));
    }
}
