//! Deck domain entity and its structural invariants

use crate::card::entities::{Card, CardCounts};
use crate::investigator::entities::Investigator;
use serde::{Deserialize, Serialize};

/// An ordered-by-insertion multiset of card codes bound to an investigator.
/// The core treats decks handed in as immutable (spec §3 Ownership): methods
/// here never mutate in place, they return new values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    pub investigator_code: Option<String>,
    pub cards: CardCounts,
    pub xp_budget: Option<u32>,
    pub owned_packs: Option<Vec<String>>,
    pub archetype: Option<String>,
    pub notes: Option<String>,
}

impl Deck {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: CardCounts) -> Self {
        Self {
            cards,
            ..Default::default()
        }
    }

    /// Total count of cards that count toward deck size (spec §3:
    /// permanents and bonded cards excluded). Requires a card lookup
    /// because "counts toward deck size" depends on card flags.
    pub fn counted_size(&self, cards_by_code: &std::collections::HashMap<String, Card>) -> u32 {
        self.cards
            .iter()
            .filter_map(|(code, count)| {
                cards_by_code
                    .get(code)
                    .filter(|c| c.counts_toward_deck_size())
                    .map(|_| *count)
            })
            .sum()
    }
}

/// One structural invariant violation (spec §3). `DeckValidationReport` can
/// hold several at once; `RulesAgent` is the only consumer that turns these
/// into a response, but the check itself is pure domain logic so any
/// caller can invoke it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckInvariantViolation {
    CopyCountExceeded { code: String, limit: u32, actual: u32 },
    MissingSignature { code: String, required: u32, actual: u32 },
    XpBudgetExceeded { total_xp: u32, budget: u32 },
}

/// Validate deck-level structural invariants that don't require a full
/// legality predicate per card (copy counts, signatures present, XP
/// total). Per-card faction/level legality is `investigator::legality`'s
/// job; this function assumes legality has already been checked and
/// focuses on whole-deck bookkeeping.
pub fn validate_deck_invariants(
    deck: &Deck,
    investigator: &Investigator,
    cards_by_code: &std::collections::HashMap<String, Card>,
) -> Vec<DeckInvariantViolation> {
    let mut violations = Vec::new();

    for (code, &count) in &deck.cards {
        if let Some(card) = cards_by_code.get(code) {
            let limit = card.copy_limit() as u32;
            if count > limit {
                violations.push(DeckInvariantViolation::CopyCountExceeded {
                    code: code.clone(),
                    limit,
                    actual: count,
                });
            }
        }
    }

    for sig in &investigator.required_signatures {
        let actual = *deck.cards.get(sig).unwrap_or(&0);
        if actual == 0 {
            violations.push(DeckInvariantViolation::MissingSignature {
                code: sig.clone(),
                required: 1,
                actual,
            });
        }
    }

    if let Some(budget) = deck.xp_budget {
        let total_xp: u32 = deck
            .cards
            .iter()
            .filter_map(|(code, &count)| {
                cards_by_code.get(code).map(|card| {
                    // Myriad extras count at zero XP (spec §3).
                    let billable = if card.flags.myriad { 1 } else { count };
                    card.xp as u32 * billable
                })
            })
            .sum();
        if total_xp > budget {
            violations.push(DeckInvariantViolation::XpBudgetExceeded { total_xp, budget });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::entities::{CardFlags, CardType, Faction, SkillIcons};
    use std::collections::{BTreeSet, HashMap};

    fn card(code: &str, xp: u8, myriad: bool) -> Card {
        Card {
            code: code.into(),
            name: code.into(),
            faction: Faction::Guardian,
            factions: BTreeSet::from([Faction::Guardian]),
            cost: Some(1),
            card_type: CardType::Asset,
            subtype: None,
            traits: BTreeSet::new(),
            skill_icons: SkillIcons::default(),
            xp,
            flags: CardFlags { myriad, ..Default::default() },
            text: String::new(),
            pack_code: "core".into(),
        }
    }

    #[test]
    fn copy_count_violation_detected() {
        let mut cards = HashMap::new();
        cards.insert("01039".to_string(), card("01039", 0, false));
        let deck = Deck::with_cards(CardCounts::from([("01039".to_string(), 3)]));
        let inv = Investigator::new("01001", "Roland Banks");
        let violations = validate_deck_invariants(&deck, &inv, &cards);
        assert_eq!(
            violations,
            vec![DeckInvariantViolation::CopyCountExceeded {
                code: "01039".into(),
                limit: 2,
                actual: 3,
            }]
        );
    }

    #[test]
    fn missing_signature_detected() {
        let cards = HashMap::new();
        let deck = Deck::empty();
        let mut inv = Investigator::new("01001", "Roland Banks");
        inv.required_signatures = vec!["01006".into()];
        let violations = validate_deck_invariants(&deck, &inv, &cards);
        assert_eq!(
            violations,
            vec![DeckInvariantViolation::MissingSignature {
                code: "01006".into(),
                required: 1,
                actual: 0,
            }]
        );
    }

    #[test]
    fn myriad_extras_count_at_zero_xp() {
        let mut cards = HashMap::new();
        cards.insert("60110".to_string(), card("60110", 2, true));
        let deck = Deck {
            cards: CardCounts::from([("60110".to_string(), 3)]),
            xp_budget: Some(2),
            ..Default::default()
        };
        let inv = Investigator::new("01001", "Roland Banks");
        let violations = validate_deck_invariants(&deck, &inv, &cards);
        assert!(violations.is_empty());
    }
}
