//! In-memory card/investigator store, loaded once at startup from a JSON
//! card pool (spec §6: "card ingestion from upstream APIs" is out of
//! scope for the core — this adapter only serves an already-loaded set).

use std::collections::HashMap;

use advisor_domain::{Card, CardPredicate, Investigator};
use advisor_application::ports::{CardStore, CardStoreError};
use async_trait::async_trait;

pub struct InMemoryCardStore {
    cards: HashMap<String, Card>,
    investigators: HashMap<String, Investigator>,
}

impl InMemoryCardStore {
    pub fn new(cards: Vec<Card>, investigators: Vec<Investigator>) -> Self {
        Self {
            cards: cards.into_iter().map(|c| (c.code.clone(), c)).collect(),
            investigators: investigators.into_iter().map(|i| (i.code.clone(), i)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn get_card(&self, code: &str) -> Result<Option<Card>, CardStoreError> {
        Ok(self.cards.get(code).cloned())
    }

    async fn search_cards(&self, predicate: &CardPredicate) -> Result<Vec<Card>, CardStoreError> {
        Ok(self.cards.values().filter(|c| predicate.matches(c)).cloned().collect())
    }

    async fn get_investigator(&self, code: &str) -> Result<Option<Investigator>, CardStoreError> {
        Ok(self.investigators.get(code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_domain::{CardFlags, CardType, Faction, SkillIcons};
    use std::collections::BTreeSet;

    fn card(code: &str, faction: Faction) -> Card {
        Card {
            code: code.to_string(),
            name: code.to_string(),
            faction,
            factions: BTreeSet::from([faction]),
            cost: Some(2),
            card_type: CardType::Asset,
            subtype: None,
            traits: BTreeSet::new(),
            skill_icons: SkillIcons::default(),
            xp: 0,
            flags: CardFlags::default(),
            text: String::new(),
            pack_code: "core".to_string(),
        }
    }

    #[tokio::test]
    async fn get_card_returns_none_for_unknown_code() {
        let store = InMemoryCardStore::new(vec![], vec![]);
        assert!(store.get_card("99999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_cards_applies_predicate() {
        let store = InMemoryCardStore::new(
            vec![card("01039", Faction::Guardian), card("01030", Faction::Seeker)],
            vec![],
        );
        let predicate = CardPredicate {
            factions: vec![Faction::Seeker],
            ..Default::default()
        };
        let results = store.search_cards(&predicate).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code, "01030");
    }

    #[tokio::test]
    async fn get_investigator_returns_none_for_unknown_code() {
        let store = InMemoryCardStore::new(vec![], vec![Investigator::new("01001", "Roland Banks")]);
        assert!(store.get_investigator("99999").await.unwrap().is_none());
        assert!(store.get_investigator("01001").await.unwrap().is_some());
    }
}
