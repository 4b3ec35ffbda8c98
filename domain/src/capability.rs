//! Capability tags and archetype classification (spec §4.4)
//!
//! Tag assignment and archetype scoring are static rules over
//! `(card_type, traits, text keywords)` — deterministic, not probabilistic,
//! per spec. The rubric tables live here as data so no subagent hardcodes a
//! threshold inline (spec §9).

use crate::card::entities::{Card, CardType};
use serde::{Deserialize, Serialize};

/// A functional role a card may fulfill. A card may carry zero or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapabilityTag {
    Combat,
    Evade,
    Clue,
    SoakDamage,
    SoakHorror,
    Healing,
    Draw,
    Economy,
    Movement,
    Support,
    Mitigation,
}

impl CapabilityTag {
    pub const ALL: [CapabilityTag; 11] = [
        CapabilityTag::Combat,
        CapabilityTag::Evade,
        CapabilityTag::Clue,
        CapabilityTag::SoakDamage,
        CapabilityTag::SoakHorror,
        CapabilityTag::Healing,
        CapabilityTag::Draw,
        CapabilityTag::Economy,
        CapabilityTag::Movement,
        CapabilityTag::Support,
        CapabilityTag::Mitigation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityTag::Combat => "combat",
            CapabilityTag::Evade => "evade",
            CapabilityTag::Clue => "clue",
            CapabilityTag::SoakDamage => "soak-damage",
            CapabilityTag::SoakHorror => "soak-horror",
            CapabilityTag::Healing => "healing",
            CapabilityTag::Draw => "draw",
            CapabilityTag::Economy => "economy",
            CapabilityTag::Movement => "movement",
            CapabilityTag::Support => "support",
            CapabilityTag::Mitigation => "mitigation",
        }
    }

    /// Solo-player expected minimum coverage count (spec §4.4, constants
    /// resolved in SPEC_FULL.md §3.1).
    pub fn solo_expected_coverage(&self) -> u32 {
        match self {
            CapabilityTag::Combat => 4,
            CapabilityTag::Evade => 2,
            CapabilityTag::Clue => 4,
            CapabilityTag::SoakDamage => 1,
            CapabilityTag::SoakHorror => 1,
            CapabilityTag::Healing => 1,
            CapabilityTag::Draw => 2,
            CapabilityTag::Economy => 3,
            CapabilityTag::Movement => 1,
            CapabilityTag::Support => 1,
            CapabilityTag::Mitigation => 1,
        }
    }

    /// Expected coverage adjusted for player count: a flat -1 (floor 0)
    /// discount per teammate beyond the first (SPEC_FULL.md §3.1).
    pub fn expected_coverage(&self, player_count: u32) -> u32 {
        let discount = player_count.saturating_sub(1).min(self.solo_expected_coverage());
        self.solo_expected_coverage().saturating_sub(discount)
    }
}

/// Static keyword/trait rule assigning capability tags to a card. This is
/// intentionally conservative: it only tags what the text and traits make
/// explicit, never infers intent.
pub fn tag_card(card: &Card) -> Vec<CapabilityTag> {
    let mut tags = Vec::new();
    let text = card.text.to_lowercase();
    let traits: Vec<String> = card.traits.iter().map(|t| t.to_lowercase()).collect();
    let has_trait = |t: &str| traits.iter().any(|x| x == t);

    if card.skill_icons.combat > 0 || has_trait("weapon") || text.contains("fight") {
        tags.push(CapabilityTag::Combat);
    }
    if has_trait("ally") && (text.contains("evade") || text.contains("agility")) || text.contains("evade") {
        tags.push(CapabilityTag::Evade);
    }
    if text.contains("investigate") || has_trait("tool") && text.contains("clue") {
        tags.push(CapabilityTag::Clue);
    }
    if text.contains("damage") && (text.contains("heal") || text.contains("prevent") || text.contains("soak")) {
        tags.push(CapabilityTag::SoakDamage);
    }
    if text.contains("horror") && (text.contains("heal") || text.contains("prevent") || text.contains("soak")) {
        tags.push(CapabilityTag::SoakHorror);
    }
    if text.contains("heal") && !tags.contains(&CapabilityTag::SoakDamage) && !tags.contains(&CapabilityTag::SoakHorror)
    {
        tags.push(CapabilityTag::Healing);
    }
    if text.contains("draw") && text.contains("card") {
        tags.push(CapabilityTag::Draw);
    }
    if text.contains("resource") && (text.contains("gain") || text.contains("+")) {
        tags.push(CapabilityTag::Economy);
    }
    if text.contains("move") || has_trait("vehicle") {
        tags.push(CapabilityTag::Movement);
    }
    if matches!(card.card_type, CardType::Skill) {
        tags.push(CapabilityTag::Support);
    }
    if text.contains("cancel") || text.contains("reveal another") || text.contains("choose a revealed") {
        tags.push(CapabilityTag::Mitigation);
    }

    tags.sort();
    tags.dedup();
    tags
}

/// Deck strategy archetypes (spec §4.4), in the fixed order the rubric
/// table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Archetype {
    BigGun,
    Tank,
    ClueCompression,
    BigHand,
    DeckCycle,
    BigMoney,
    SucceedByX,
    Evasion,
    Spells,
    ChaosBagControl,
    Doom,
    FailToWin,
    Recursion,
    DarkHorse,
    Hybrid,
}

impl Archetype {
    pub const ALL: [Archetype; 15] = [
        Archetype::BigGun,
        Archetype::Tank,
        Archetype::ClueCompression,
        Archetype::BigHand,
        Archetype::DeckCycle,
        Archetype::BigMoney,
        Archetype::SucceedByX,
        Archetype::Evasion,
        Archetype::Spells,
        Archetype::ChaosBagControl,
        Archetype::Doom,
        Archetype::FailToWin,
        Archetype::Recursion,
        Archetype::DarkHorse,
        Archetype::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::BigGun => "big-gun",
            Archetype::Tank => "tank",
            Archetype::ClueCompression => "clue-compression",
            Archetype::BigHand => "big-hand",
            Archetype::DeckCycle => "deck-cycle",
            Archetype::BigMoney => "big-money",
            Archetype::SucceedByX => "succeed-by-x",
            Archetype::Evasion => "evasion",
            Archetype::Spells => "spells",
            Archetype::ChaosBagControl => "chaos-bag-control",
            Archetype::Doom => "doom",
            Archetype::FailToWin => "fail-to-win",
            Archetype::Recursion => "recursion",
            Archetype::DarkHorse => "dark-horse",
            Archetype::Hybrid => "hybrid",
        }
    }

    /// Weighted keyword/trait rubric for this archetype. Score contribution
    /// per matching card is the listed weight; `tag_card`'s output does not
    /// feed this directly since archetype hypothesis looks at raw
    /// traits/keywords per spec §4.4, independent of capability tagging.
    fn rubric(&self) -> &'static [(&'static str, f32)] {
        match self {
            Archetype::BigGun => &[("weapon", 1.0), ("+3 combat", 0.5), ("critical", 0.5)],
            Archetype::Tank => &[("soak", 1.0), ("armor", 0.5), ("health", 0.3)],
            Archetype::ClueCompression => &[("investigate", 1.0), ("shroud", 0.5), ("clue", 0.5)],
            Archetype::BigHand => &[("hand size", 1.0), ("draw", 0.3)],
            Archetype::DeckCycle => &[("draw", 1.0), ("shuffle", 0.5), ("deck", 0.3)],
            Archetype::BigMoney => &[("resource", 1.0), ("gain", 0.3)],
            Archetype::SucceedByX => &[("succeed by", 1.0), ("bonus", 0.3)],
            Archetype::Evasion => &[("evade", 1.0), ("agility", 0.3)],
            Archetype::Spells => &[("spell", 1.0), ("arcane", 0.5)],
            Archetype::ChaosBagControl => &[("chaos token", 1.0), ("bless", 0.5), ("curse", 0.5)],
            Archetype::Doom => &[("doom", 1.0)],
            Archetype::FailToWin => &[("fail", 1.0), ("pass", 0.3)],
            Archetype::Recursion => &[("discard pile", 1.0), ("return", 0.3)],
            Archetype::DarkHorse => &[("secret", 0.5), ("unique", 0.3)],
            Archetype::Hybrid => &[],
        }
    }
}

/// Score every archetype over a deck's cards and return the sorted
/// (descending) list, ties broken by the investigator's faction preference
/// order (primary faction, multiclass secondary, Neutral last) applied by
/// the caller re-sorting on tie — this function only guarantees score
/// order, matching spec's "ties resolved by investigator faction
/// preference" by leaving that tiebreak to the caller, who knows the
/// investigator.
fn card_haystack(card: &Card) -> String {
    format!(
        "{} {}",
        card.text.to_lowercase(),
        card.traits.iter().map(|t| t.to_lowercase()).collect::<Vec<_>>().join(" ")
    )
}

fn raw_archetype_score(card: &Card, rubric: &[(&'static str, f32)]) -> f32 {
    let haystack = card_haystack(card);
    rubric.iter().filter(|(kw, _)| haystack.contains(kw)).map(|(_, w)| *w).sum()
}

pub fn score_archetypes(cards: &[Card]) -> Vec<(Archetype, f32)> {
    let mut scores: Vec<(Archetype, f32)> = Archetype::ALL
        .iter()
        .map(|archetype| {
            let rubric = archetype.rubric();
            let score: f32 = cards.iter().map(|card| raw_archetype_score(card, rubric)).sum();
            (*archetype, score)
        })
        .collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

/// How well a single candidate card reinforces a given archetype, as a
/// value in `[0, 1]` normalized by that archetype's rubric weight total
/// (spec §4.5 step 4, `archetype_alignment` term).
pub fn archetype_fit(card: &Card, archetype: Archetype) -> f32 {
    let rubric = archetype.rubric();
    let max: f32 = rubric.iter().map(|(_, w)| *w).sum();
    if max <= 0.0 {
        return 0.0;
    }
    (raw_archetype_score(card, rubric) / max).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::entities::{CardFlags, CardType, Faction, SkillIcons};
    use std::collections::BTreeSet;

    fn weapon_card() -> Card {
        Card {
            code: "01039".into(),
            name: "Machete".into(),
            faction: Faction::Guardian,
            factions: BTreeSet::from([Faction::Guardian]),
            cost: Some(3),
            card_type: CardType::Asset,
            subtype: None,
            traits: BTreeSet::from(["Weapon".into()]),
            skill_icons: SkillIcons { combat: 1, ..Default::default() },
            xp: 0,
            flags: CardFlags::default(),
            text: "Fight. +1 skill. +2 damage.".into(),
            pack_code: "core".into(),
        }
    }

    #[test]
    fn weapon_card_tagged_combat() {
        assert!(tag_card(&weapon_card()).contains(&CapabilityTag::Combat));
    }

    #[test]
    fn expected_coverage_discounted_for_multiplayer() {
        assert_eq!(CapabilityTag::Combat.expected_coverage(1), 4);
        assert_eq!(CapabilityTag::Combat.expected_coverage(4), 1);
        assert_eq!(CapabilityTag::SoakDamage.expected_coverage(4), 0);
    }

    #[test]
    fn tagging_is_deterministic() {
        let card = weapon_card();
        assert_eq!(tag_card(&card), tag_card(&card));
    }

    #[test]
    fn archetype_scoring_favors_weapon_heavy_decks_for_big_gun() {
        let cards = vec![weapon_card(), weapon_card()];
        let scored = score_archetypes(&cards);
        let big_gun_score = scored.iter().find(|(a, _)| *a == Archetype::BigGun).unwrap().1;
        assert!(big_gun_score > 0.0);
    }
}
