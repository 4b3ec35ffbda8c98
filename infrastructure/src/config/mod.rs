//! Configuration file loading for deck-advisor (spec §4.9)
//!
//! Priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./deck-advisor.toml` or `./.deck-advisor.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/deck-advisor/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileActionSpaceConfig, FileConfig, FileLlmConfig, FileOrchestratorConfig,
    FileRetrievalConfig, FileSimulatorConfig, FileSubagentCacheConfig,
};
pub use loader::ConfigLoader;
