//! Cache adapters (spec §4.9 `[subagent_cache]`)

mod lru_ttl;

pub use lru_ttl::{LruTtlResponseCache, LruTtlSimulationCache};
