//! LRU + TTL cache implementations for `ResponseCache` and
//! `SimulationCache` (spec §4.9 `[subagent_cache]`).

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use advisor_application::ports::{ResponseCache, SimulationCache};
use advisor_domain::SimulationReport;
use async_trait::async_trait;
use lru::LruCache;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Per-agent response cache, keyed by `SubagentRequest::canonical_key()`
/// prefixed with the agent kind (spec §4.2).
pub struct LruTtlResponseCache {
    inner: Mutex<LruCache<String, Entry<String>>>,
    ttl: Duration,
}

impl LruTtlResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity must be nonzero");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }
}

#[async_trait]
impl ResponseCache for LruTtlResponseCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut cache = self.inner.lock().unwrap();
        let entry = cache.get(key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            cache.pop(key);
            return None;
        }
        Some(entry.value.clone())
    }

    async fn put(&self, key: String, value: String) {
        let mut cache = self.inner.lock().unwrap();
        cache.put(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }
}

/// Simulation report cache, keyed by `(deck_hash, config_hash)`.
pub struct LruTtlSimulationCache {
    inner: Mutex<LruCache<(u64, u64), Entry<SimulationReport>>>,
    ttl: Duration,
}

impl LruTtlSimulationCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity must be nonzero");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }
}

#[async_trait]
impl SimulationCache for LruTtlSimulationCache {
    async fn get(&self, deck_hash: u64, config_hash: u64) -> Option<SimulationReport> {
        let mut cache = self.inner.lock().unwrap();
        let key = (deck_hash, config_hash);
        let entry = cache.get(&key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            cache.pop(&key);
            return None;
        }
        Some(entry.value.clone())
    }

    async fn put(&self, deck_hash: u64, config_hash: u64, report: SimulationReport) {
        let mut cache = self.inner.lock().unwrap();
        cache.put(
            (deck_hash, config_hash),
            Entry {
                value: report,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn response_cache_roundtrips_within_ttl() {
        let cache = LruTtlResponseCache::new(4, Duration::from_secs(60));
        cache.put("RulesAgent:key".to_string(), "value".to_string()).await;
        assert_eq!(cache.get("RulesAgent:key").await, Some("value".to_string()));
    }

    #[tokio::test]
    async fn response_cache_expires_past_ttl() {
        let cache = LruTtlResponseCache::new(4, Duration::from_millis(1));
        cache.put("RulesAgent:key".to_string(), "value".to_string()).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.get("RulesAgent:key").await, None);
    }

    #[tokio::test]
    async fn response_cache_evicts_least_recently_used_past_capacity() {
        let cache = LruTtlResponseCache::new(1, Duration::from_secs(60));
        cache.put("a".to_string(), "1".to_string()).await;
        cache.put("b".to_string(), "2".to_string()).await;
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("b").await, Some("2".to_string()));
    }

    #[tokio::test]
    async fn simulation_cache_roundtrips_within_ttl() {
        let cache = LruTtlSimulationCache::new(4, Duration::from_secs(60));
        let report = SimulationReport::empty(1, 2, 3);
        cache.put(1, 2, report).await;
        assert!(cache.get(1, 2).await.is_some());
    }
}
