//! Orchestrator state machine and per-request state (spec §3, §4.1)

use crate::core::error::DomainError;
use crate::orchestration::value_objects::OrchestratorOutput;
use crate::subagent::entities::{AgentKind, SubagentRequest, SubagentResponse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primary query classification (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QueryType {
    Rules,
    Analyze,
    Search,
    Scenario,
    BuildDeck,
    General,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Rules => "rules",
            QueryType::Analyze => "analyze",
            QueryType::Search => "search",
            QueryType::Scenario => "scenario",
            QueryType::BuildDeck => "build-deck",
            QueryType::General => "general",
        }
    }

    /// Tie-break priority when multiple classes match (spec §4.1): higher
    /// value wins.
    fn priority(&self) -> u8 {
        match self {
            QueryType::BuildDeck => 5,
            QueryType::Scenario => 4,
            QueryType::Search => 3,
            QueryType::Analyze => 2,
            QueryType::Rules => 1,
            QueryType::General => 0,
        }
    }

    /// Resolve the winner among several candidate classifications by the
    /// spec's fixed priority order: build-deck > scenario > search >
    /// analyze > rules > general.
    pub fn highest_priority(candidates: &[QueryType]) -> QueryType {
        candidates
            .iter()
            .copied()
            .max_by_key(|q| q.priority())
            .unwrap_or(QueryType::General)
    }
}

/// Orchestrator lifecycle state (spec §4.1): forward-only, two terminal
/// states beyond `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrchestratorPhase {
    New,
    Classifying,
    Dispatched,
    Collecting,
    Synthesizing,
    Done,
    Failed,
    Cancelled,
}

impl OrchestratorPhase {
    /// Whether `next` is a legal forward transition from `self`.
    /// `Cancelled` is reachable from any non-terminal state at any time
    /// (spec §4.1: "Cancellation from the caller at any point").
    pub fn can_advance_to(&self, next: OrchestratorPhase) -> bool {
        use OrchestratorPhase::*;
        if matches!(next, Cancelled) {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (New, Classifying)
                | (Classifying, Dispatched)
                | (Dispatched, Collecting)
                | (Collecting, Synthesizing)
                | (Synthesizing, Done)
                | (Classifying, Failed)
                | (Dispatched, Failed)
                | (Collecting, Failed)
                | (Synthesizing, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrchestratorPhase::Done | OrchestratorPhase::Failed | OrchestratorPhase::Cancelled)
    }
}

/// Per-request state ferried through the orchestrator graph (spec §3).
/// Created on request entry, discarded on response emission — callers
/// should not persist this across requests.
#[derive(Debug, Clone)]
pub struct OrchestratorState {
    pub request: SubagentRequest,
    pub phase: OrchestratorPhase,
    pub classification: Option<QueryType>,
    pub selected_agents: Vec<AgentKind>,
    pub responses: BTreeMap<AgentKind, SubagentResponse>,
    pub final_output: Option<OrchestratorOutput>,
}

impl OrchestratorState {
    pub fn new(request: SubagentRequest) -> Self {
        Self {
            request,
            phase: OrchestratorPhase::New,
            classification: None,
            selected_agents: Vec::new(),
            responses: BTreeMap::new(),
            final_output: None,
        }
    }

    /// Advance the state machine, rejecting illegal backward/skip
    /// transitions with `DomainError::InternalBug`.
    pub fn advance(&mut self, next: OrchestratorPhase) -> Result<(), DomainError> {
        if !self.phase.can_advance_to(next) {
            return Err(DomainError::InternalBug(format!(
                "illegal orchestrator transition {:?} -> {:?}",
                self.phase, next
            )));
        }
        self.phase = next;
        Ok(())
    }

    pub fn record_response(&mut self, response: SubagentResponse) {
        self.responses.insert(response.agent, response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_type_priority_prefers_build_deck() {
        let candidates = [QueryType::Rules, QueryType::BuildDeck, QueryType::Search];
        assert_eq!(QueryType::highest_priority(&candidates), QueryType::BuildDeck);
    }

    #[test]
    fn empty_candidates_fall_back_to_general() {
        assert_eq!(QueryType::highest_priority(&[]), QueryType::General);
    }

    #[test]
    fn state_machine_forward_only() {
        let mut state = OrchestratorState::new(SubagentRequest::new("hi"));
        assert!(state.advance(OrchestratorPhase::Classifying).is_ok());
        assert!(state.advance(OrchestratorPhase::Dispatched).is_ok());
        // Cannot skip back to Classifying.
        assert!(state.advance(OrchestratorPhase::Classifying).is_err());
    }

    #[test]
    fn cancellation_reachable_from_any_nonterminal_state() {
        let mut state = OrchestratorState::new(SubagentRequest::new("hi"));
        assert!(state.advance(OrchestratorPhase::Cancelled).is_ok());
        assert!(state.phase.is_terminal());
    }

    #[test]
    fn terminal_states_cannot_advance_further() {
        let mut state = OrchestratorState::new(SubagentRequest::new("hi"));
        state.advance(OrchestratorPhase::Classifying).unwrap();
        state.advance(OrchestratorPhase::Failed).unwrap();
        assert!(state.advance(OrchestratorPhase::Cancelled).is_err());
    }
}
