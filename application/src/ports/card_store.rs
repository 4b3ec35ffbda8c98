//! Card and investigator lookup port (spec §6)

use advisor_domain::{Card, CardPredicate, Investigator};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardStoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only lookup against the loaded card and investigator pool.
/// Loading and refreshing the underlying data set is an infrastructure
/// concern; this port only exposes queries the application layer needs.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn get_card(&self, code: &str) -> Result<Option<Card>, CardStoreError>;

    async fn search_cards(&self, predicate: &CardPredicate) -> Result<Vec<Card>, CardStoreError>;

    async fn get_investigator(&self, code: &str) -> Result<Option<Investigator>, CardStoreError>;
}
