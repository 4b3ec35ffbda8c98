//! Application layer: ports the domain is driven through, the four
//! concrete subagents, and the orchestrator/simulation use cases.

pub mod ports;
pub mod prompt;
pub mod subagent;
pub mod use_cases;

pub use prompt::PromptTemplate;
pub use use_cases::{
    OrchestrateError, OrchestrateRequestUseCase, OrchestratorBudgets, SimulateDeckError,
    SimulateDeckUseCase,
};
