//! Deck simulation domain model

pub mod entities;

pub use entities::{KeyCardStat, SimulationConfig, SimulationReport};
