//! Deck simulation orchestration: cache lookup, simulator invocation, and
//! cache population keyed by `(deck_hash, config_hash)` (spec §4.7).

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use advisor_domain::{Card, Deck, SimulationConfig, SimulationReport};
use thiserror::Error;
use tracing::debug;

use crate::ports::{DeckSimulator, SimulationCache, SimulatorError};

#[derive(Debug, Error)]
pub enum SimulateDeckError {
    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}

/// Stable hash of the deck content the simulator actually reads: the
/// card multiset and investigator, not bookkeeping fields like notes
/// (spec §4.7 cache key is `(deck content hash, config hash)`).
fn deck_hash(deck: &Deck) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    deck.investigator_code.hash(&mut hasher);
    deck.cards.hash(&mut hasher);
    hasher.finish()
}

pub struct SimulateDeckUseCase {
    simulator: Arc<dyn DeckSimulator>,
    cache: Arc<dyn SimulationCache>,
}

impl SimulateDeckUseCase {
    pub fn new(simulator: Arc<dyn DeckSimulator>, cache: Arc<dyn SimulationCache>) -> Self {
        Self { simulator, cache }
    }

    pub async fn execute(
        &self,
        deck: &Deck,
        cards_by_code: &BTreeMap<String, Card>,
        config: &SimulationConfig,
    ) -> Result<SimulationReport, SimulateDeckError> {
        let deck_hash = deck_hash(deck);
        let config_hash = config.config_hash();

        if let Some(cached) = self.cache.get(deck_hash, config_hash).await {
            debug!(deck_hash, config_hash, "simulation cache hit");
            return Ok(cached);
        }

        let report = self.simulator.simulate(deck, cards_by_code, config).await?;
        self.cache.put(deck_hash, config_hash, report.clone()).await;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_domain::{CardCounts, MulliganStrategy};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct CountingSimulator {
        calls: AtomicU32,
    }

    #[async_trait]
    impl DeckSimulator for CountingSimulator {
        async fn simulate(
            &self,
            _deck: &Deck,
            _cards_by_code: &BTreeMap<String, Card>,
            config: &SimulationConfig,
        ) -> Result<SimulationReport, SimulatorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SimulationReport::empty(1, config.config_hash(), 42))
        }
    }

    #[derive(Default)]
    struct InMemorySimulationCache {
        entries: Mutex<BTreeMap<(u64, u64), SimulationReport>>,
    }

    #[async_trait]
    impl SimulationCache for InMemorySimulationCache {
        async fn get(&self, deck_hash: u64, config_hash: u64) -> Option<SimulationReport> {
            self.entries.lock().unwrap().get(&(deck_hash, config_hash)).cloned()
        }

        async fn put(&self, deck_hash: u64, config_hash: u64, report: SimulationReport) {
            self.entries.lock().unwrap().insert((deck_hash, config_hash), report);
        }
    }

    #[tokio::test]
    async fn second_call_with_same_deck_and_config_hits_cache() {
        let simulator = Arc::new(CountingSimulator { calls: AtomicU32::new(0) });
        let cache = Arc::new(InMemorySimulationCache::default());
        let use_case = SimulateDeckUseCase::new(simulator.clone(), cache);

        let deck = Deck::with_cards(CardCounts::from([("01039".to_string(), 2)]));
        let cards = BTreeMap::new();
        let config = SimulationConfig {
            mulligan_strategy: MulliganStrategy::Aggressive,
            ..Default::default()
        };

        use_case.execute(&deck, &cards, &config).await.unwrap();
        use_case.execute(&deck, &cards, &config).await.unwrap();

        assert_eq!(simulator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_config_bypasses_cache() {
        let simulator = Arc::new(CountingSimulator { calls: AtomicU32::new(0) });
        let cache = Arc::new(InMemorySimulationCache::default());
        let use_case = SimulateDeckUseCase::new(simulator.clone(), cache);

        let deck = Deck::with_cards(CardCounts::from([("01039".to_string(), 2)]));
        let cards = BTreeMap::new();
        let mut config_a = SimulationConfig::default();
        config_a.n_trials = 100;
        let mut config_b = SimulationConfig::default();
        config_b.n_trials = 200;

        use_case.execute(&deck, &cards, &config_a).await.unwrap();
        use_case.execute(&deck, &cards, &config_b).await.unwrap();

        assert_eq!(simulator.calls.load(Ordering::SeqCst), 2);
    }
}
