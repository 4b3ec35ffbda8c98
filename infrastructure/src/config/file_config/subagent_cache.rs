//! Per-agent response cache sizing from TOML (`[subagent_cache]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSubagentCacheConfig {
    pub ttl_secs: u64,
    pub capacity_per_agent: usize,
}

impl Default for FileSubagentCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            capacity_per_agent: 256,
        }
    }
}
