//! Raw TOML configuration data types (spec §4.9)
//!
//! These structs represent the exact structure of the TOML config file and
//! are deserialized directly via `figment`.

mod action_space;
mod llm;
mod orchestrator;
mod retrieval;
mod simulator;
mod subagent_cache;

pub use action_space::FileActionSpaceConfig;
pub use llm::FileLlmConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use retrieval::FileRetrievalConfig;
pub use simulator::FileSimulatorConfig;
pub use subagent_cache::FileSubagentCacheConfig;

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub orchestrator: FileOrchestratorConfig,
    pub retrieval: FileRetrievalConfig,
    pub subagent_cache: FileSubagentCacheConfig,
    pub action_space: FileActionSpaceConfig,
    pub simulator: FileSimulatorConfig,
    pub llm: FileLlmConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.orchestrator.global_timeout_secs, 45);
        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(config.subagent_cache.ttl_secs, 600);
        assert_eq!(config.action_space.top_k, 25);
        assert_eq!(config.simulator.default_trials, 1000);
    }

    #[test]
    fn deserializes_partial_overrides() {
        let toml_str = r#"
[orchestrator]
max_concurrency = 4

[simulator]
default_trials = 500
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.orchestrator.max_concurrency, 4);
        assert_eq!(config.orchestrator.global_timeout_secs, 45);
        assert_eq!(config.simulator.default_trials, 500);
    }
}
