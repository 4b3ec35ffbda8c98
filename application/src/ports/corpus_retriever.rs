//! Corpus retrieval port (spec §6)

use advisor_domain::{RetrievalFilters, ScoredChunk};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("corpus unavailable: {0}")]
    Unavailable(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Read-only, idempotent retrieval against the domain corpus (rules
/// reference, meta doctrine, scenario notes). Implementations live in
/// infrastructure; the physical layout and embedding generation are
/// explicitly out of scope for the core (spec §1).
#[async_trait]
pub trait CorpusRetriever: Send + Sync {
    async fn lexical_search(
        &self,
        query: &str,
        filters: &RetrievalFilters,
    ) -> Result<Vec<ScoredChunk>, RetrievalError>;

    async fn semantic_search(
        &self,
        query: &str,
        filters: &RetrievalFilters,
    ) -> Result<Vec<ScoredChunk>, RetrievalError>;
}
