//! Investigator domain entities

use crate::card::entities::Faction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// How a deckbuilding option clause consumes a card's "slot". Per spec §6,
/// `LimitedOther` clauses cap the number of cards they admit; `Unlimited`
/// clauses do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Unlimited,
    LimitedOther,
}

/// One clause of an investigator's deckbuilding option set (spec §6
/// canonical form).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckbuildingOption {
    pub faction_set: BTreeSet<Faction>,
    pub level_min: u8,
    pub level_max: u8,
    /// Empty = any trait admitted.
    pub trait_filter: BTreeSet<String>,
    pub slot_kind: SlotKind,
    /// Only meaningful when `slot_kind == LimitedOther`.
    pub slot_limit: Option<u32>,
    /// Free-text clause fragment, used only so the agent's `reason` can
    /// quote the rules text verbatim; never matched against programmatically
    /// except for the literal substring "other" per spec §4.3 point 3.
    pub text_contains: Option<String>,
}

impl DeckbuildingOption {
    pub fn level_range(&self) -> RangeInclusive<u8> {
        self.level_min..=self.level_max
    }

    /// Whether the descriptor text names this as an "other"-type slot, per
    /// spec §4.3 point 3 and Open Question (b): the rule text is taken
    /// literally, so this checks the clause's own descriptor, not the
    /// `slot_kind` enum value.
    pub fn is_other_category(&self) -> bool {
        self.text_contains
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains("other"))
    }

    pub fn admits_faction(&self, faction: &Faction) -> bool {
        self.faction_set.contains(faction)
    }

    pub fn admits_level(&self, level: u8) -> bool {
        self.level_range().contains(&level)
    }

    pub fn admits_traits(&self, traits: &BTreeSet<String>) -> bool {
        self.trait_filter.is_empty() || self.trait_filter.iter().any(|t| traits.contains(t))
    }
}

/// An investigator's base stats and deckbuilding access rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investigator {
    pub code: String,
    pub name: String,
    pub base_willpower: u8,
    pub base_intellect: u8,
    pub base_combat: u8,
    pub base_agility: u8,
    pub health: u8,
    pub sanity: u8,
    pub deck_size: u32,
    pub required_signatures: Vec<String>,
    pub random_basic_weakness_count: u32,
    pub deckbuilding_options: Vec<DeckbuildingOption>,
    /// Primary faction(s), used for archetype tie-breaking (spec §4.4) and
    /// for the multiplayer expected-coverage table lookup.
    pub factions: BTreeSet<Faction>,
}

impl Investigator {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            base_willpower: 0,
            base_intellect: 0,
            base_combat: 0,
            base_agility: 0,
            health: 0,
            sanity: 0,
            deck_size: 30,
            required_signatures: Vec::new(),
            random_basic_weakness_count: 0,
            deckbuilding_options: Vec::new(),
            factions: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guardian_unlimited() -> DeckbuildingOption {
        DeckbuildingOption {
            faction_set: BTreeSet::from([Faction::Guardian]),
            level_min: 0,
            level_max: 5,
            trait_filter: BTreeSet::new(),
            slot_kind: SlotKind::Unlimited,
            slot_limit: None,
            text_contains: None,
        }
    }

    #[test]
    fn admits_faction_and_level() {
        let opt = guardian_unlimited();
        assert!(opt.admits_faction(&Faction::Guardian));
        assert!(!opt.admits_faction(&Faction::Seeker));
        assert!(opt.admits_level(3));
    }

    #[test]
    fn other_category_checked_literally() {
        let mut opt = guardian_unlimited();
        opt.slot_kind = SlotKind::LimitedOther;
        opt.slot_limit = Some(5);
        assert!(!opt.is_other_category());
        opt.text_contains = Some("5 cards of other factions (level 0-5)".into());
        assert!(opt.is_other_category());
    }
}
