//! Orchestrator fan-out budgets from TOML (`[orchestrator]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    pub per_agent_timeout_secs: u64,
    pub global_timeout_secs: u64,
    pub max_concurrency: usize,
    pub synthesizer_retries: u32,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            per_agent_timeout_secs: 20,
            global_timeout_secs: 45,
            max_concurrency: 8,
            synthesizer_retries: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let config = FileOrchestratorConfig::default();
        assert_eq!(config.per_agent_timeout_secs, 20);
        assert_eq!(config.global_timeout_secs, 45);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.synthesizer_retries, 1);
    }
}
