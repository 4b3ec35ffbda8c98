//! Deck simulator port (spec §6)

use advisor_domain::{Card, Deck, SimulationConfig, SimulationReport};
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("deck is empty after filtering non-deck cards")]
    EmptyDeck,
    #[error("simulation cancelled")]
    Cancelled,
}

/// Runs a seeded Monte Carlo opening-hand / early-turn simulation over a
/// deck (spec §4.7). Implementations must be deterministic for a given
/// `(deck, config, seed)` triple.
#[async_trait]
pub trait DeckSimulator: Send + Sync {
    async fn simulate(
        &self,
        deck: &Deck,
        cards_by_code: &BTreeMap<String, Card>,
        config: &SimulationConfig,
    ) -> Result<SimulationReport, SimulatorError>;
}
