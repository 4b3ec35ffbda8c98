//! Deterministic card legality predicate (spec §4.3, §4.5, §9)
//!
//! This is the single place the "can this card go in this investigator's
//! deck" decision is computed. `RulesAgent` calls it to build
//! `legality_decisions`; `ActionSpaceAgent` calls it as a hard filter. Both
//! get the same answer for the same inputs regardless of call order or
//! candidate-pool ordering (testable property: legality commutativity),
//! because the function takes one card at a time and has no internal
//! mutable state.

use crate::card::entities::Card;
use crate::investigator::entities::Investigator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of a legality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Allow,
    Deny,
    /// Investigator or card could not be resolved.
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Allow => "allow",
            Verdict::Deny => "deny",
            Verdict::Unknown => "unknown",
        }
    }
}

/// A single card's legality verdict plus a human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalityDecision {
    pub card_id: String,
    pub verdict: Verdict,
    pub reason: String,
}

/// Everything beyond (investigator, card) the predicate needs: deck-local
/// state (how many copies already committed, how many "other" slots
/// already spent) and request-local state (Taboo mode, XP budget, owned
/// packs).
#[derive(Debug, Clone, Default)]
pub struct LegalityContext<'a> {
    pub taboo_mode: bool,
    /// True if this specific card is forbidden by the active Taboo list.
    /// Resolved by the caller against the corpus; ignored unless
    /// `taboo_mode` is set (spec §4.3 point 2).
    pub taboo_banned: bool,
    pub xp_budget: Option<u32>,
    /// Copies of this card's title already present in the deck, not
    /// counting the candidate itself.
    pub current_copies: u32,
    /// "Other"-category slots already consumed in the deck, keyed by the
    /// option's `text_contains` descriptor (distinct limited-other clauses
    /// have independent budgets).
    pub other_slot_used: u32,
    pub owned_sets: Option<&'a BTreeSet<String>>,
}

/// Check whether `card` may be included in `investigator`'s deck under
/// `ctx`. See spec §4.3 for the numbered rule this implements.
pub fn check_legality(
    investigator: &Investigator,
    card: &Card,
    ctx: &LegalityContext<'_>,
) -> LegalityDecision {
    let level = card.xp;

    // Rule 1/3: at least one option admits this card's faction, level, and
    // traits. A multiclass card qualifies if ANY of its factions qualify.
    let matching_option = investigator.deckbuilding_options.iter().find(|opt| {
        card.factions.iter().any(|f| opt.admits_faction(f))
            && opt.admits_level(level)
            && opt.admits_traits(&card.traits)
    });

    let Some(matching_option) = matching_option else {
        return LegalityDecision {
            card_id: card.code.clone(),
            verdict: Verdict::Deny,
            reason: format!(
                "no deckbuilding option admits faction(s) {:?} at level {}",
                card.factions, level
            ),
        };
    };

    if ctx.taboo_mode && ctx.taboo_banned {
        return LegalityDecision {
            card_id: card.code.clone(),
            verdict: Verdict::Deny,
            reason: "forbidden by Taboo".into(),
        };
    }

    let copy_limit = card.copy_limit() as u32;
    if ctx.current_copies >= copy_limit {
        let reason = if card.flags.exceptional {
            "Exceptional: max 1".to_string()
        } else {
            format!("max {copy_limit} copies")
        };
        return LegalityDecision {
            card_id: card.code.clone(),
            verdict: Verdict::Deny,
            reason,
        };
    }

    if let Some(budget) = ctx.xp_budget
        && level as u32 > budget
    {
        return LegalityDecision {
            card_id: card.code.clone(),
            verdict: Verdict::Deny,
            reason: format!("XP {level} exceeds budget {budget}"),
        };
    }

    if matching_option.is_other_category()
        && let Some(limit) = matching_option.slot_limit
        && ctx.other_slot_used >= limit
    {
        return LegalityDecision {
            card_id: card.code.clone(),
            verdict: Verdict::Deny,
            reason: format!("\"other\" slot limit ({limit}) already filled"),
        };
    }

    if let Some(owned) = ctx.owned_sets
        && !owned.contains(&card.pack_code)
    {
        return LegalityDecision {
            card_id: card.code.clone(),
            verdict: Verdict::Deny,
            reason: format!("pack \"{}\" not in owned sets", card.pack_code),
        };
    }

    LegalityDecision {
        card_id: card.code.clone(),
        verdict: Verdict::Allow,
        reason: "admitted by deckbuilding options".into(),
    }
}

/// Verdict used when the investigator or card itself is unresolvable.
pub fn unknown_decision(card_id: impl Into<String>, reason: impl Into<String>) -> LegalityDecision {
    LegalityDecision {
        card_id: card_id.into(),
        verdict: Verdict::Unknown,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::entities::{CardFlags, CardType, Faction, SkillIcons};
    use crate::investigator::entities::{DeckbuildingOption, SlotKind};

    fn roland() -> Investigator {
        let mut inv = Investigator::new("01001", "Roland Banks");
        inv.factions = BTreeSet::from([Faction::Guardian]);
        inv.deckbuilding_options = vec![
            DeckbuildingOption {
                faction_set: BTreeSet::from([Faction::Guardian]),
                level_min: 0,
                level_max: 5,
                trait_filter: BTreeSet::new(),
                slot_kind: SlotKind::Unlimited,
                slot_limit: None,
                text_contains: None,
            },
            DeckbuildingOption {
                faction_set: BTreeSet::from([Faction::Neutral]),
                level_min: 0,
                level_max: 5,
                trait_filter: BTreeSet::new(),
                slot_kind: SlotKind::Unlimited,
                slot_limit: None,
                text_contains: None,
            },
        ];
        inv
    }

    fn shrivelling_lvl0() -> Card {
        Card {
            code: "01060".into(),
            name: "Shrivelling".into(),
            faction: Faction::Mystic,
            factions: BTreeSet::from([Faction::Mystic]),
            cost: Some(3),
            card_type: CardType::Asset,
            subtype: Some("Arcane.".into()),
            traits: BTreeSet::from(["Spell".into()]),
            skill_icons: SkillIcons::default(),
            xp: 0,
            flags: CardFlags::default(),
            text: "Fight. +3 combat. +2 damage.".into(),
            pack_code: "core".into(),
        }
    }

    fn machete() -> Card {
        Card {
            code: "01039".into(),
            name: "Machete".into(),
            faction: Faction::Guardian,
            factions: BTreeSet::from([Faction::Guardian]),
            cost: Some(3),
            card_type: CardType::Asset,
            subtype: None,
            traits: BTreeSet::from(["Item".into(), "Weapon".into()]),
            skill_icons: SkillIcons::default(),
            xp: 0,
            flags: CardFlags::default(),
            text: String::new(),
            pack_code: "core".into(),
        }
    }

    #[test]
    fn roland_cannot_take_mystic_card() {
        let decision = check_legality(&roland(), &shrivelling_lvl0(), &LegalityContext::default());
        assert_eq!(decision.verdict, Verdict::Deny);
        assert!(decision.reason.contains("faction"));
    }

    #[test]
    fn roland_can_take_guardian_card() {
        let decision = check_legality(&roland(), &machete(), &LegalityContext::default());
        assert_eq!(decision.verdict, Verdict::Allow);
    }

    #[test]
    fn exceptional_second_copy_is_denied() {
        let mut card = machete();
        card.flags.exceptional = true;
        let ctx = LegalityContext {
            current_copies: 1,
            ..Default::default()
        };
        let decision = check_legality(&roland(), &card, &ctx);
        assert_eq!(decision.verdict, Verdict::Deny);
        assert_eq!(decision.reason, "Exceptional: max 1");
    }

    #[test]
    fn xp_over_budget_is_denied() {
        let mut card = machete();
        card.xp = 3;
        let ctx = LegalityContext {
            xp_budget: Some(2),
            ..Default::default()
        };
        let decision = check_legality(&roland(), &card, &ctx);
        assert_eq!(decision.verdict, Verdict::Deny);
        assert!(decision.reason.contains("XP"));
    }

    #[test]
    fn ownership_filter_denies_unowned_pack() {
        let mut card = machete();
        card.pack_code = "dunwich".into();
        let owned = BTreeSet::from(["core".to_string()]);
        let ctx = LegalityContext {
            owned_sets: Some(&owned),
            ..Default::default()
        };
        let decision = check_legality(&roland(), &card, &ctx);
        assert_eq!(decision.verdict, Verdict::Deny);
    }

    #[test]
    fn legality_is_order_insensitive_over_a_pool() {
        let pool = [machete(), shrivelling_lvl0()];
        let forward: Vec<_> = pool
            .iter()
            .map(|c| check_legality(&roland(), c, &LegalityContext::default()).verdict)
            .collect();
        let backward: Vec<_> = pool
            .iter()
            .rev()
            .map(|c| check_legality(&roland(), c, &LegalityContext::default()).verdict)
            .collect();
        let mut backward_in_forward_order = backward;
        backward_in_forward_order.reverse();
        assert_eq!(forward, backward_in_forward_order);
    }
}
