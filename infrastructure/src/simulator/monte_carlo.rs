//! Seeded Monte Carlo opening-hand / early-turn simulator (spec §4.7).
//!
//! Deliberately narrow: no skill tests, no encounter deck, no card
//! draw/economy abilities beyond the flat "draw 1, gain 1" per-turn model.
//! These simplifications are stated in every report's warnings list.

use std::collections::{BTreeMap, HashMap, VecDeque};

use advisor_domain::{
    tag_card, Card, CapabilityTag, CostBin, Deck, KeyCardStat, MulliganStrategy, SimulationConfig,
    SimulationReport,
};
use advisor_application::ports::{DeckSimulator, SimulatorError};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A card drawn into a trial's working deck, resolved once up front so the
/// per-trial loop never re-touches the card store.
#[derive(Clone)]
struct SimCard {
    code: String,
    cost: i32,
    score: f32,
    is_economy: bool,
    is_asset: bool,
}

const OPENING_HAND_SIZE: usize = 5;
const KEY_CARD_SUCCESS_TURN: u32 = 3;
const PLAYABLE_BY_TURN_2_COST: i32 = 2;
const SLOW_SETUP_THRESHOLD: f32 = 3.5;
const LOW_CONSISTENCY_THRESHOLD: f32 = 0.5;
const UNRELIABLE_KEY_CARD_THRESHOLD: f32 = 0.5;

pub struct MonteCarloSimulator;

impl MonteCarloSimulator {
    pub fn new() -> Self {
        Self
    }

    fn build_sim_deck(deck: &Deck, cards_by_code: &BTreeMap<String, Card>) -> Vec<SimCard> {
        let mut sim_cards = Vec::new();
        for (code, &count) in &deck.cards {
            let Some(card) = cards_by_code.get(code) else {
                continue;
            };
            if !card.counts_toward_deck_size() {
                continue;
            }
            let score = card.skill_icons.total() as f32 + 1.0;
            let is_economy = tag_card(card).contains(&CapabilityTag::Economy);
            let is_asset = matches!(card.card_type, advisor_domain::CardType::Asset);
            for _ in 0..count {
                sim_cards.push(SimCard {
                    code: code.clone(),
                    cost: card.cost.unwrap_or(0).max(0),
                    score,
                    is_economy,
                    is_asset,
                });
            }
        }
        sim_cards
    }

    /// Greedy knapsack: play the highest-scoring playable cards the
    /// resource budget allows, highest score first.
    fn play_greedy(hand: &mut Vec<SimCard>, resources: &mut u32, assets_in_play: &mut u32) -> u32 {
        hand.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        let mut spent = 0u32;
        let mut played_indices = Vec::new();
        for (i, card) in hand.iter().enumerate() {
            let cost = card.cost.max(0) as u32;
            if cost <= *resources - spent {
                spent += cost;
                played_indices.push(i);
                if card.is_asset {
                    *assets_in_play += 1;
                }
            }
        }
        for &i in played_indices.iter().rev() {
            hand.remove(i);
        }
        *resources -= spent;
        spent
    }

    fn apply_mulligan(
        hand: Vec<SimCard>,
        deck_queue: &mut VecDeque<SimCard>,
        strategy: MulliganStrategy,
        target_cards: &[String],
    ) -> (Vec<SimCard>, bool) {
        let keep_predicate: Box<dyn Fn(&SimCard) -> bool> = match strategy {
            MulliganStrategy::Aggressive => Box::new(move |c: &SimCard| {
                target_cards.contains(&c.code) || c.is_economy
            }),
            MulliganStrategy::Conservative => {
                let playable_by_turn_2 = hand.iter().filter(|c| c.cost <= PLAYABLE_BY_TURN_2_COST).count();
                if playable_by_turn_2 >= 2 {
                    Box::new(|_: &SimCard| true)
                } else {
                    Box::new(|c: &SimCard| c.cost <= PLAYABLE_BY_TURN_2_COST)
                }
            }
        };

        let mut mulliganed = false;
        let mut new_hand = Vec::with_capacity(hand.len());
        for card in hand {
            if keep_predicate(&card) {
                new_hand.push(card);
            } else {
                mulliganed = true;
                if let Some(replacement) = deck_queue.pop_front() {
                    new_hand.push(replacement);
                }
            }
        }
        (new_hand, mulliganed)
    }

    fn run_trial(
        sim_deck: &[SimCard],
        config: &SimulationConfig,
        rng: &mut ChaCha8Rng,
        target_cards: &[String],
    ) -> TrialOutcome {
        let mut deck: Vec<SimCard> = sim_deck.to_vec();
        deck.shuffle(rng);
        let mut deck_queue: VecDeque<SimCard> = deck.into_iter().collect();

        let opening_draw: Vec<SimCard> = (0..OPENING_HAND_SIZE)
            .filter_map(|_| deck_queue.pop_front())
            .collect();

        let (mut hand, mulliganed) =
            Self::apply_mulligan(opening_draw, &mut deck_queue, config.mulligan_strategy, target_cards);

        let opening_hand_codes: Vec<String> = hand.iter().map(|c| c.code.clone()).collect();
        let mut first_draw_turn: HashMap<String, u32> = HashMap::new();
        for code in &opening_hand_codes {
            first_draw_turn.entry(code.clone()).or_insert(0);
        }

        let playable_in_opening = hand.iter().filter(|c| c.cost <= PLAYABLE_BY_TURN_2_COST).count();

        let mut resources = 0u32;
        let mut total_gained = 0u32;
        let mut total_spent = 0u32;
        let mut assets_in_play = 0u32;
        let mut setup_turn: Option<u32> = None;

        for turn in 1..=config.turns {
            if let Some(drawn) = deck_queue.pop_front() {
                first_draw_turn.entry(drawn.code.clone()).or_insert(turn);
                hand.push(drawn);
            }
            resources += 1;
            total_gained += 1;
            let spent = Self::play_greedy(&mut hand, &mut resources, &mut assets_in_play);
            total_spent += spent;

            if setup_turn.is_none() && assets_in_play >= 2 {
                setup_turn = Some(turn);
            }
        }

        let key_card_drawn_by_turn3 = target_cards.is_empty()
            || target_cards.iter().any(|code| {
                first_draw_turn.get(code).is_some_and(|&t| t <= KEY_CARD_SUCCESS_TURN)
            });

        let success = key_card_drawn_by_turn3 && playable_in_opening >= 2 && total_spent <= total_gained;

        TrialOutcome {
            mulliganed,
            opening_hand_codes,
            first_draw_turn,
            setup_turn,
            success,
            resources_gained: total_gained,
            resources_spent: total_spent,
        }
    }
}

impl Default for MonteCarloSimulator {
    fn default() -> Self {
        Self::new()
    }
}

struct TrialOutcome {
    mulliganed: bool,
    opening_hand_codes: Vec<String>,
    first_draw_turn: HashMap<String, u32>,
    setup_turn: Option<u32>,
    success: bool,
    resources_gained: u32,
    resources_spent: u32,
}

fn cost_curve_distribution(sim_deck: &[SimCard]) -> BTreeMap<CostBin, u32> {
    let mut distribution = BTreeMap::new();
    for card in sim_deck {
        *distribution.entry(CostBin::of(Some(card.cost))).or_insert(0) += 1;
    }
    distribution
}

fn warnings_for(
    avg_setup_turn: Option<f32>,
    success_rate: f32,
    key_card_stats: &[KeyCardStat],
    sim_deck_empty: bool,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if sim_deck_empty {
        warnings.push("insufficient deck size".to_string());
        return warnings;
    }
    if avg_setup_turn.is_some_and(|t| t > SLOW_SETUP_THRESHOLD) {
        warnings.push("slow setup".to_string());
    }
    if success_rate < LOW_CONSISTENCY_THRESHOLD {
        warnings.push("low consistency".to_string());
    }
    for stat in key_card_stats {
        let by_turn_3 = stat.by_turn_probability.get(&KEY_CARD_SUCCESS_TURN).copied().unwrap_or(0.0);
        if by_turn_3 < UNRELIABLE_KEY_CARD_THRESHOLD {
            let name = stat.name.clone().unwrap_or_else(|| stat.code.clone());
            warnings.push(format!("unreliable key card {name}"));
        }
    }
    warnings
}

#[async_trait]
impl DeckSimulator for MonteCarloSimulator {
    async fn simulate(
        &self,
        deck: &Deck,
        cards_by_code: &BTreeMap<String, Card>,
        config: &SimulationConfig,
    ) -> Result<SimulationReport, SimulatorError> {
        let deck_hash = {
            use std::hash::{Hash, Hasher};
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            deck.investigator_code.hash(&mut hasher);
            deck.cards.hash(&mut hasher);
            hasher.finish()
        };
        let config_hash = config.config_hash();
        let seed_used = config.seed.unwrap_or_else(rand::random);

        let sim_deck = Self::build_sim_deck(deck, cards_by_code);

        if sim_deck.is_empty() || config.n_trials == 0 {
            let mut report = SimulationReport::empty(deck_hash, config_hash, seed_used);
            report.warnings = warnings_for(None, 0.0, &[], sim_deck.is_empty());
            return Ok(report);
        }

        let target_cards: Vec<String> = config
            .target_cards
            .clone()
            .unwrap_or_else(|| default_key_cards(&sim_deck));

        let mut successes = 0u32;
        let mut mulligans = 0u32;
        let mut setup_turns = Vec::new();
        let mut efficiency_sum = 0f32;
        let mut opening_presence: HashMap<String, u32> = HashMap::new();
        let mut by_turn_presence: HashMap<String, BTreeMap<u32, u32>> = HashMap::new();
        let mut first_draw_turns: HashMap<String, Vec<u32>> = HashMap::new();

        for trial_index in 0..config.n_trials {
            let trial_seed = seed_used ^ trial_index as u64;
            let mut rng = ChaCha8Rng::seed_from_u64(trial_seed);
            let outcome = Self::run_trial(&sim_deck, config, &mut rng, &target_cards);

            if outcome.success {
                successes += 1;
            }
            if outcome.mulliganed {
                mulligans += 1;
            }
            if let Some(turn) = outcome.setup_turn {
                setup_turns.push(turn);
            }
            if outcome.resources_gained > 0 {
                efficiency_sum += outcome.resources_spent as f32 / outcome.resources_gained as f32;
            }

            for code in &target_cards {
                if outcome.opening_hand_codes.contains(code) {
                    *opening_presence.entry(code.clone()).or_insert(0) += 1;
                }
                if let Some(&drawn_turn) = outcome.first_draw_turn.get(code) {
                    first_draw_turns.entry(code.clone()).or_default().push(drawn_turn);
                    let turn_counts = by_turn_presence.entry(code.clone()).or_default();
                    for turn in drawn_turn..=config.turns {
                        *turn_counts.entry(turn).or_insert(0) += 1;
                    }
                }
            }
        }

        let n = config.n_trials as f32;
        let key_card_stats: Vec<KeyCardStat> = target_cards
            .iter()
            .map(|code| {
                let name = cards_by_code.get(code).map(|c| c.name.clone());
                let in_opening_probability = *opening_presence.get(code).unwrap_or(&0) as f32 / n;
                let by_turn_probability = (1..=config.turns)
                    .map(|turn| {
                        let count = by_turn_presence
                            .get(code)
                            .and_then(|m| m.get(&turn))
                            .copied()
                            .unwrap_or(0);
                        (turn, count as f32 / n)
                    })
                    .collect();
                let draws = first_draw_turns.get(code);
                let mean_first_draw_turn = draws.filter(|d| !d.is_empty()).map(|d| {
                    d.iter().sum::<u32>() as f32 / d.len() as f32
                });
                KeyCardStat {
                    code: code.clone(),
                    name,
                    in_opening_probability,
                    by_turn_probability,
                    mean_first_draw_turn,
                }
            })
            .collect();

        let avg_setup_turn = if setup_turns.is_empty() {
            None
        } else {
            Some(setup_turns.iter().sum::<u32>() as f32 / setup_turns.len() as f32)
        };
        let success_rate = successes as f32 / n;
        let mulligan_rate = mulligans as f32 / n;
        let resource_efficiency = efficiency_sum / n;
        let cost_curve_distribution = cost_curve_distribution(&sim_deck);
        let warnings = warnings_for(avg_setup_turn, success_rate, &key_card_stats, false);

        Ok(SimulationReport {
            n_trials: config.n_trials,
            avg_setup_turn,
            success_rate,
            mulligan_rate,
            resource_efficiency,
            cost_curve_distribution,
            key_card_stats,
            warnings,
            seed_used,
            deck_hash,
            config_hash,
        })
    }
}

/// When the caller doesn't name `target_cards`, track the highest-scoring
/// unique cards in the deck as a reasonable stand-in for "key cards"
/// (spec §4.7: "defaults to cards the StateAgent tags as key").
fn default_key_cards(sim_deck: &[SimCard]) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut scored: Vec<(&str, f32)> = sim_deck
        .iter()
        .filter(|c| seen.insert(c.code.clone()))
        .map(|c| (c.code.as_str(), c.score))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(3).map(|(code, _)| code.to_string()).collect()
}
