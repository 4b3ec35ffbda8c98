//! Deck domain model

pub mod entities;

pub use entities::{validate_deck_invariants, Deck, DeckInvariantViolation};
