//! Loads a card/investigator pool from a JSON file on disk into the
//! shapes `InMemoryCardStore` wants.

use std::path::Path;

use advisor_domain::{Card, Investigator};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardPoolLoadError {
    #[error("failed to read card pool file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse card pool file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CardPoolFile {
    #[serde(default)]
    cards: Vec<Card>,
    #[serde(default)]
    investigators: Vec<Investigator>,
}

pub struct CardPool {
    pub cards: Vec<Card>,
    pub investigators: Vec<Investigator>,
}

pub fn load_card_pool(path: impl AsRef<Path>) -> Result<CardPool, CardPoolLoadError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| CardPoolLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let parsed: CardPoolFile = serde_json::from_str(&raw).map_err(|source| CardPoolLoadError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(CardPool {
        cards: parsed.cards,
        investigators: parsed.investigators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_cards_and_investigators_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        std::fs::write(
            &path,
            r#"{
                "cards": [{
                    "code": "01039",
                    "name": "Machete",
                    "faction": "Guardian",
                    "factions": ["Guardian"],
                    "cost": 3,
                    "card_type": "Asset",
                    "subtype": null,
                    "traits": ["Weapon"],
                    "skill_icons": {"willpower": 0, "intellect": 0, "combat": 0, "agility": 0, "wild": 0},
                    "xp": 0,
                    "flags": {"exceptional": false, "permanent": false, "myriad": false, "fast": false, "unique": false, "bonded": false},
                    "text": "Fight. +1 skill. +2 damage.",
                    "pack_code": "core"
                }],
                "investigators": [{
                    "code": "01001",
                    "name": "Roland Banks",
                    "base_willpower": 3,
                    "base_intellect": 3,
                    "base_combat": 4,
                    "base_agility": 2,
                    "health": 9,
                    "sanity": 5,
                    "deck_size": 30,
                    "required_signatures": [],
                    "random_basic_weakness_count": 1,
                    "deckbuilding_options": [],
                    "factions": ["Guardian"]
                }]
            }"#,
        )
        .unwrap();

        let pool = load_card_pool(&path).unwrap();
        assert_eq!(pool.cards.len(), 1);
        assert_eq!(pool.investigators.len(), 1);
        assert_eq!(pool.cards[0].code, "01039");
    }

    #[test]
    fn missing_file_returns_io_error() {
        let result = load_card_pool("/nonexistent/deeply/nested/pool.json");
        assert!(matches!(result, Err(CardPoolLoadError::Io { .. })));
    }
}
