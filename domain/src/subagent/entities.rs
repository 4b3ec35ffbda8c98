//! Subagent request/response envelope (spec §3) — the uniform contract
//! every specialized analyzer speaks.

use crate::card::entities::CardCounts;
use crate::investigator::legality::LegalityDecision;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which analyzer produced a response, and the discriminant for
/// `SubagentResponse::payload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Rules,
    State,
    ActionSpace,
    Scenario,
}

impl AgentKind {
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Rules => "RulesAgent",
            AgentKind::State => "StateAgent",
            AgentKind::ActionSpace => "ActionSpaceAgent",
            AgentKind::Scenario => "ScenarioAgent",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mulligan policy requested for simulation (spec §4.7, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MulliganStrategy {
    #[default]
    Aggressive,
    Conservative,
}

impl std::str::FromStr for MulliganStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aggressive" => Ok(MulliganStrategy::Aggressive),
            "conservative" => Ok(MulliganStrategy::Conservative),
            other => Err(format!("unknown mulligan strategy: {other}")),
        }
    }
}

/// Uniform request envelope every subagent receives (spec §3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubagentRequest {
    pub message: String,
    pub investigator_id: Option<String>,
    pub investigator_name: Option<String>,
    pub deck_id: Option<String>,
    pub deck_cards: Option<CardCounts>,
    pub scenario_name: Option<String>,
    pub campaign_name: Option<String>,
    pub upgrade_xp: Option<u32>,
    pub owned_sets: Option<Vec<String>>,
    pub taboo_mode: bool,
    pub player_count: u32,
    pub mulligan_strategy: MulliganStrategy,
}

impl SubagentRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            investigator_id: None,
            investigator_name: None,
            deck_id: None,
            deck_cards: None,
            scenario_name: None,
            campaign_name: None,
            upgrade_xp: None,
            owned_sets: None,
            taboo_mode: false,
            player_count: 1,
            mulligan_strategy: MulliganStrategy::default(),
        }
    }

    /// Stable hash used as the cache key alongside the agent name (spec
    /// §4.2). Canonicalization sorts `deck_cards` (already a `BTreeMap`)
    /// and `owned_sets` so request field ordering never changes the key.
    pub fn canonical_key(&self) -> String {
        let mut owned = self.owned_sets.clone().unwrap_or_default();
        owned.sort();
        format!(
            "msg={}|inv={:?}|deck={:?}|scenario={:?}|xp={:?}|owned={:?}|taboo={}|players={}|mulligan={:?}",
            self.message.trim().to_lowercase(),
            self.investigator_id,
            self.deck_cards,
            self.scenario_name,
            self.upgrade_xp,
            owned,
            self.taboo_mode,
            self.player_count,
            self.mulligan_strategy,
        )
    }
}

/// A citation back to the corpus chunk that grounded part of a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub source_id: String,
    pub section_path: String,
    pub excerpt: String,
}

/// Discriminated structured payload, one variant per `AgentKind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AgentPayload {
    Rules {
        legality_decisions: Vec<LegalityDecision>,
    },
    State {
        composition: crate::orchestration::value_objects::CompositionSummary,
    },
    ActionSpace {
        candidates: Vec<crate::orchestration::value_objects::Candidate>,
        applied_filters: Vec<String>,
    },
    Scenario {
        threats: Vec<crate::orchestration::value_objects::ThreatEntry>,
        recommended_traits: Vec<String>,
    },
    Empty,
}

/// Per-agent diagnostic metadata (spec §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentDiagnostics {
    pub duration_ms: u64,
    pub retrieval_hits: u32,
    pub error: bool,
    pub error_kind: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// Uniform response envelope every subagent returns (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubagentResponse {
    pub agent: AgentKind,
    pub content: String,
    pub confidence: f32,
    pub payload: AgentPayload,
    pub citations: Vec<Citation>,
    pub diagnostics: AgentDiagnostics,
    /// Scalar relevance weight this agent assigns itself for synthesis
    /// aggregation (spec §4.1 "declared relevance", default 1.0).
    pub relevance: f32,
}

impl SubagentResponse {
    pub fn empty_error(agent: AgentKind, content: impl Into<String>, error_kind: &str) -> Self {
        Self {
            agent,
            content: content.into(),
            confidence: 0.0,
            payload: AgentPayload::Empty,
            citations: Vec::new(),
            diagnostics: AgentDiagnostics {
                error: true,
                error_kind: Some(error_kind.to_string()),
                ..Default::default()
            },
            relevance: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_ignores_owned_sets_order() {
        let mut a = SubagentRequest::new("upgrade my deck");
        a.owned_sets = Some(vec!["core".into(), "dunwich".into()]);
        let mut b = SubagentRequest::new("upgrade my deck");
        b.owned_sets = Some(vec!["dunwich".into(), "core".into()]);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn canonical_key_is_case_insensitive_on_message() {
        let a = SubagentRequest::new("Upgrade My Deck");
        let b = SubagentRequest::new("upgrade my deck");
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn mulligan_strategy_parses() {
        assert_eq!("aggressive".parse::<MulliganStrategy>().unwrap(), MulliganStrategy::Aggressive);
        assert_eq!("Conservative".parse::<MulliganStrategy>().unwrap(), MulliganStrategy::Conservative);
        assert!("whatever".parse::<MulliganStrategy>().is_err());
    }
}
