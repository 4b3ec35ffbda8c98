//! Card domain model

pub mod entities;

pub use entities::{Card, CardCounts, CardFlags, CardPredicate, CardType, Faction, SkillIcons};
