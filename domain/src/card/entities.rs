//! Card domain entities

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A card's faction. `Multi` covers cards that list more than one faction
/// icon (e.g. Guardian/Seeker); the set of factions a multiclass card
/// actually belongs to lives on [`Card::factions`], not in this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    Guardian,
    Seeker,
    Rogue,
    Mystic,
    Survivor,
    Neutral,
    Multi,
}

impl Faction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Faction::Guardian => "guardian",
            Faction::Seeker => "seeker",
            Faction::Rogue => "rogue",
            Faction::Mystic => "mystic",
            Faction::Survivor => "survivor",
            Faction::Neutral => "neutral",
            Faction::Multi => "multi",
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Card type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardType {
    Asset,
    Event,
    Skill,
    Treachery,
    Enemy,
    Investigator,
}

/// The four skills plus wild icons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillIcons {
    pub willpower: u8,
    pub intellect: u8,
    pub combat: u8,
    pub agility: u8,
    pub wild: u8,
}

impl SkillIcons {
    pub fn total(&self) -> u32 {
        self.willpower as u32 + self.intellect as u32 + self.combat as u32 + self.agility as u32 + self.wild as u32
    }
}

/// Boolean deckbuilding/text flags that affect legality or counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardFlags {
    pub exceptional: bool,
    pub permanent: bool,
    pub myriad: bool,
    pub fast: bool,
    pub unique: bool,
    /// True if this card is bonded to another card (set aside, doesn't
    /// count toward deck size).
    pub bonded: bool,
}

/// Immutable card record. Identity is `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub code: String,
    pub name: String,
    /// Primary/display faction. For multiclass cards this is `Faction::Multi`
    /// and `factions` lists the actual set.
    pub faction: Faction,
    /// The factions this card actually qualifies under. A single-faction
    /// card has exactly one entry equal to `faction`.
    pub factions: BTreeSet<Faction>,
    pub cost: Option<i32>,
    pub card_type: CardType,
    pub subtype: Option<String>,
    pub traits: BTreeSet<String>,
    pub skill_icons: SkillIcons,
    pub xp: u8,
    pub flags: CardFlags,
    pub text: String,
    pub pack_code: String,
}

impl Card {
    /// Per-title copy limit implied by this card's flags (spec §3).
    pub fn copy_limit(&self) -> u8 {
        if self.flags.exceptional {
            1
        } else if self.flags.myriad {
            3
        } else {
            2
        }
    }

    pub fn counts_toward_deck_size(&self) -> bool {
        !self.flags.permanent && !self.flags.bonded
    }
}

/// A predicate used by `CardStore::search_cards` — kept as plain data so
/// infrastructure adapters can filter without taking a closure across an
/// async boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardPredicate {
    pub factions: Vec<Faction>,
    pub traits: Vec<String>,
    pub card_types: Vec<CardType>,
    pub max_xp: Option<u8>,
    pub max_cost: Option<i32>,
    pub text_contains: Option<String>,
}

impl CardPredicate {
    pub fn matches(&self, card: &Card) -> bool {
        if !self.factions.is_empty() && !self.factions.iter().any(|f| card.factions.contains(f)) {
            return false;
        }
        if !self.traits.is_empty() && !self.traits.iter().any(|t| card.traits.contains(t)) {
            return false;
        }
        if !self.card_types.is_empty() && !self.card_types.contains(&card.card_type) {
            return false;
        }
        if let Some(max_xp) = self.max_xp
            && card.xp > max_xp
        {
            return false;
        }
        if let Some(max_cost) = self.max_cost
            && card.cost.is_some_and(|c| c > max_cost)
        {
            return false;
        }
        if let Some(needle) = &self.text_contains
            && !card.text.to_lowercase().contains(&needle.to_lowercase())
        {
            return false;
        }
        true
    }
}

/// A counted multiset of card codes, as carried on requests and decks.
pub type CardCounts = BTreeMap<String, u32>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> Card {
        Card {
            code: "01039".into(),
            name: "Machete".into(),
            faction: Faction::Guardian,
            factions: BTreeSet::from([Faction::Guardian]),
            cost: Some(3),
            card_type: CardType::Asset,
            subtype: Some("Hand. Melee. Weapon.".into()),
            traits: BTreeSet::from(["Item".into(), "Weapon".into(), "Melee".into()]),
            skill_icons: SkillIcons::default(),
            xp: 0,
            flags: CardFlags::default(),
            text: "Fight. +1 skill. +2 damage.".into(),
            pack_code: "core".into(),
        }
    }

    #[test]
    fn copy_limit_defaults_to_two() {
        assert_eq!(sample_card().copy_limit(), 2);
    }

    #[test]
    fn exceptional_caps_at_one() {
        let mut card = sample_card();
        card.flags.exceptional = true;
        assert_eq!(card.copy_limit(), 1);
    }

    #[test]
    fn myriad_caps_at_three() {
        let mut card = sample_card();
        card.flags.myriad = true;
        assert_eq!(card.copy_limit(), 3);
    }

    #[test]
    fn permanents_and_bonded_dont_count() {
        let mut card = sample_card();
        assert!(card.counts_toward_deck_size());
        card.flags.permanent = true;
        assert!(!card.counts_toward_deck_size());
        card.flags = CardFlags { bonded: true, ..Default::default() };
        assert!(!card.counts_toward_deck_size());
    }

    #[test]
    fn predicate_filters_by_faction_and_xp() {
        let card = sample_card();
        let predicate = CardPredicate {
            factions: vec![Faction::Seeker],
            ..Default::default()
        };
        assert!(!predicate.matches(&card));

        let predicate = CardPredicate {
            factions: vec![Faction::Guardian],
            max_xp: Some(0),
            ..Default::default()
        };
        assert!(predicate.matches(&card));
    }
}
