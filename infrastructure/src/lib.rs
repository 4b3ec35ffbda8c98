//! Infrastructure layer for Deck Advisor Core: adapters implementing the
//! application layer's ports against concrete backends (in-memory card
//! pool and corpus, HTTP LLM gateway, LRU+TTL caches, the Monte Carlo
//! simulator) plus configuration loading and logging setup.

pub mod cache;
pub mod cardstore;
pub mod config;
pub mod corpus;
pub mod llm;
pub mod logging;
pub mod simulator;

pub use cache::{LruTtlResponseCache, LruTtlSimulationCache};
pub use cardstore::{load_card_pool, CardPool, CardPoolLoadError, InMemoryCardStore};
pub use config::{
    ConfigLoader, FileActionSpaceConfig, FileConfig, FileLlmConfig, FileOrchestratorConfig,
    FileRetrievalConfig, FileSimulatorConfig, FileSubagentCacheConfig,
};
pub use corpus::InMemoryCorpusRetriever;
pub use llm::{HttpLlmGateway, MockLlmGateway};
pub use logging::init_tracing;
pub use simulator::MonteCarloSimulator;
