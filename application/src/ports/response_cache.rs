//! Per-agent and per-simulation response caching ports (spec §4.5, §4.7)

use advisor_domain::SimulationReport;
use async_trait::async_trait;

/// Caches subagent responses keyed by `SubagentRequest::canonical_key()`.
/// Entries expire after an implementation-defined TTL (spec §6.2 config).
/// `value` is the already-serialized agent response so the cache
/// implementation need not depend on `advisor-domain`'s response type
/// directly (it stores opaque JSON).
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn put(&self, key: String, value: String);
}

/// Caches Monte Carlo simulation reports keyed by `(deck_hash, config_hash)`.
#[async_trait]
pub trait SimulationCache: Send + Sync {
    async fn get(&self, deck_hash: u64, config_hash: u64) -> Option<SimulationReport>;

    async fn put(&self, deck_hash: u64, config_hash: u64, report: SimulationReport);
}
