//! Deck simulation data model (spec §3, §4.7)

use crate::orchestration::value_objects::CostBin;
use crate::subagent::entities::MulliganStrategy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simulator call parameters (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub target_cards: Option<Vec<String>>,
    pub n_trials: u32,
    pub turns: u32,
    pub mulligan_strategy: MulliganStrategy,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            target_cards: None,
            n_trials: 1000,
            turns: 5,
            mulligan_strategy: MulliganStrategy::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Stable hash of the parameters that affect simulation output,
    /// excluding the resolved seed (the cache key per spec §4.7 is
    /// `(deck content hash, config hash)`, and an unspecified seed is
    /// re-resolved fresh each call so it is deliberately excluded here).
    pub fn config_hash(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.target_cards.hash(&mut hasher);
        self.n_trials.hash(&mut hasher);
        self.turns.hash(&mut hasher);
        std::mem::discriminant(&self.mulligan_strategy).hash(&mut hasher);
        hasher.finish()
    }
}

/// Reliability statistics for one tracked "key card" (spec §3, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyCardStat {
    pub code: String,
    pub name: Option<String>,
    pub in_opening_probability: f32,
    /// Probability of having drawn the card by each simulated turn,
    /// 1-indexed.
    pub by_turn_probability: BTreeMap<u32, f32>,
    /// `None` when the card was drawn in zero trials.
    pub mean_first_draw_turn: Option<f32>,
}

/// Immutable simulation output (spec §3). May be cached keyed by
/// `(deck_hash, config_hash)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub n_trials: u32,
    pub avg_setup_turn: Option<f32>,
    pub success_rate: f32,
    pub mulligan_rate: f32,
    pub resource_efficiency: f32,
    pub cost_curve_distribution: BTreeMap<CostBin, u32>,
    pub key_card_stats: Vec<KeyCardStat>,
    pub warnings: Vec<String>,
    pub seed_used: u64,
    pub deck_hash: u64,
    pub config_hash: u64,
}

impl SimulationReport {
    /// A well-formed, NaN-free report for a zero-trial call (spec §8
    /// boundary behavior).
    pub fn empty(deck_hash: u64, config_hash: u64, seed_used: u64) -> Self {
        Self {
            n_trials: 0,
            avg_setup_turn: None,
            success_rate: 0.0,
            mulligan_rate: 0.0,
            resource_efficiency: 0.0,
            cost_curve_distribution: BTreeMap::new(),
            key_card_stats: Vec::new(),
            warnings: Vec::new(),
            seed_used,
            deck_hash,
            config_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_hash_stable_across_clones() {
        let config = SimulationConfig::default();
        assert_eq!(config.config_hash(), config.clone().config_hash());
    }

    #[test]
    fn config_hash_differs_on_trials() {
        let a = SimulationConfig::default();
        let mut b = SimulationConfig::default();
        b.n_trials = 2000;
        assert_ne!(a.config_hash(), b.config_hash());
    }

    #[test]
    fn empty_report_has_no_nan() {
        let report = SimulationReport::empty(1, 2, 3);
        assert_eq!(report.n_trials, 0);
        assert!(!report.success_rate.is_nan());
        assert!(!report.mulligan_rate.is_nan());
        assert!(!report.resource_efficiency.is_nan());
    }
}
