//! Domain layer for Deck Advisor Core
//!
//! Pure data model and pure-function business rules for Arkham Horror LCG
//! deckbuilding analysis: cards, investigators, decks, corpus chunks, the
//! subagent request/response contract, orchestrator state, and the
//! simulation report shape. Nothing here performs I/O or depends on
//! infrastructure or application concerns.

pub mod capability;
pub mod card;
pub mod core;
pub mod corpus;
pub mod deck;
pub mod investigator;
pub mod orchestration;
pub mod simulation;
pub mod subagent;
pub mod util;

pub use capability::{archetype_fit, score_archetypes, tag_card, Archetype, CapabilityTag};
pub use card::{Card, CardCounts, CardFlags, CardPredicate, CardType, Faction, SkillIcons};
pub use core::error::DomainError;
pub use corpus::{CorpusChunk, RetrievalFilters, ScoredChunk};
pub use deck::{validate_deck_invariants, Deck, DeckInvariantViolation};
pub use investigator::{
    check_legality, unknown_decision, DeckbuildingOption, Investigator, LegalityContext,
    LegalityDecision, SlotKind, Verdict,
};
pub use orchestration::{
    AdvisoryResponse, Candidate, CompositionSummary, CostBin, CostCurveStats, DeckProposal,
    DeckProposalCard, OrchestratorMetadata, OrchestratorOutput, OrchestratorPhase,
    OrchestratorState, QueryType, SkillTotals, SubagentSummary, ThreatEntry,
};
pub use simulation::{KeyCardStat, SimulationConfig, SimulationReport};
pub use subagent::{
    AgentDiagnostics, AgentKind, AgentPayload, Citation, MulliganStrategy, SubagentRequest,
    SubagentResponse,
};
