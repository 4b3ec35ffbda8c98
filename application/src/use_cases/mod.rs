//! Application use cases: the orchestrator graph and deck simulation.

pub mod orchestrate_request;
pub mod simulate_deck;

pub use orchestrate_request::{OrchestrateError, OrchestrateRequestUseCase, OrchestratorBudgets};
pub use simulate_deck::{SimulateDeckError, SimulateDeckUseCase};
