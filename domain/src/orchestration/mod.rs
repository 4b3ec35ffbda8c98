//! Orchestrator domain model: lifecycle state machine and response shapes

pub mod entities;
pub mod value_objects;

pub use entities::{OrchestratorPhase, OrchestratorState, QueryType};
pub use value_objects::{
    AdvisoryResponse, Candidate, CompositionSummary, CostBin, CostCurveStats, DeckProposal,
    DeckProposalCard, OrchestratorMetadata, OrchestratorOutput, SkillTotals, SubagentSummary,
    ThreatEntry,
};
