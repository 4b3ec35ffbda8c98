//! Investigator domain model and deckbuilding legality

pub mod entities;
pub mod legality;

pub use entities::{DeckbuildingOption, Investigator, SlotKind};
pub use legality::{check_legality, unknown_decision, LegalityContext, LegalityDecision, Verdict};
