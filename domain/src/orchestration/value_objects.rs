//! Orchestration value objects — response payload shapes (spec §4.1, §4.4,
//! §4.5, §4.6)

use crate::capability::{Archetype, CapabilityTag};
use crate::card::entities::{CardType, Faction};
use crate::subagent::entities::Citation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the six fixed cost bins used by `StateAgent`'s cost-curve
/// breakdown (spec §4.4: "0,1,2,3,4,5+").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CostBin {
    Zero,
    One,
    Two,
    Three,
    Four,
    FivePlus,
}

impl CostBin {
    pub fn of(cost: Option<i32>) -> CostBin {
        match cost.unwrap_or(0).max(0) {
            0 => CostBin::Zero,
            1 => CostBin::One,
            2 => CostBin::Two,
            3 => CostBin::Three,
            4 => CostBin::Four,
            _ => CostBin::FivePlus,
        }
    }

    pub const ALL: [CostBin; 6] = [
        CostBin::Zero,
        CostBin::One,
        CostBin::Two,
        CostBin::Three,
        CostBin::Four,
        CostBin::FivePlus,
    ];
}

/// Skill icon totals across a deck (spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillTotals {
    pub willpower: u32,
    pub intellect: u32,
    pub combat: u32,
    pub agility: u32,
    pub wild: u32,
}

/// Cost-curve descriptive statistics (spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostCurveStats {
    pub mean: f32,
    pub median: f32,
    pub p90: f32,
    /// `(cards with cost >= 4) / total`.
    pub top_heaviness: f32,
}

/// Full `StateAgent` output (spec §4.4).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompositionSummary {
    pub total_cards: u32,
    pub by_type: BTreeMap<CardType, u32>,
    pub by_faction: BTreeMap<Faction, u32>,
    pub by_cost_bin: BTreeMap<CostBin, u32>,
    pub cost_curve: CostCurveStats,
    pub skill_totals: SkillTotals,
    pub role_coverage: BTreeMap<CapabilityTag, u32>,
    pub gaps: Vec<CapabilityTag>,
    pub archetype_hypothesis: Option<Archetype>,
    pub archetype_score: f32,
    pub note: Option<String>,
}

/// One `ActionSpaceAgent` candidate (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub code: String,
    pub name: String,
    pub score: f32,
    pub matched_capabilities: Vec<CapabilityTag>,
    pub reason: String,
    /// Deckbuilding copy limit for this card title (spec §3), carried so
    /// a build-deck proposal can fill multiplicities correctly instead of
    /// assuming a flat count.
    pub copy_limit: u32,
    /// True if this candidate is one of the investigator's required
    /// signature cards (spec §4.1 DeckProposal "signature cards present").
    pub is_signature: bool,
}

/// One threat entry surfaced by `ScenarioAgent` (spec §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatEntry {
    pub skill: String,
    pub severity: f32,
    pub evidence_citation: Citation,
}

/// One line item in a `DeckProposal` (spec §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckProposalCard {
    pub card_id: String,
    pub name: String,
    pub quantity: u32,
    pub category: CapabilityTag,
    pub reason: String,
}

/// `DeckProposal` orchestrator output schema (spec §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckProposal {
    pub deck_name: String,
    pub investigator_id: String,
    pub investigator_name: String,
    pub cards: Vec<DeckProposalCard>,
    pub total_cards: u32,
    pub reasoning: String,
    pub archetype: Option<String>,
    pub warnings: Vec<String>,
    pub confidence: f32,
}

/// Per-agent summary embedded in an `AdvisoryResponse` (spec §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubagentSummary {
    pub agent: String,
    pub confidence: f32,
    pub summary: String,
    pub error: bool,
}

/// Routing/diagnostic metadata attached to every orchestrator response
/// (spec §4.1, §7).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorMetadata {
    pub query_type: Option<String>,
    pub agents_selected: Vec<String>,
    pub timings_ms: BTreeMap<String, u64>,
    pub cache_hits: BTreeMap<String, bool>,
    pub errors: Vec<String>,
    pub synthesizer_degraded: bool,
}

/// `Advisory` orchestrator output schema (spec §4.1, the default shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub content: String,
    pub recommendation: Option<String>,
    pub confidence: f32,
    pub agents_consulted: Vec<String>,
    pub subagent_results: Vec<SubagentSummary>,
    pub metadata: OrchestratorMetadata,
}

/// The orchestrator's final output is one of the two schemas (spec §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "schema")]
pub enum OrchestratorOutput {
    Advisory(AdvisoryResponse),
    DeckProposal(DeckProposal),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_bin_buckets_high_costs_into_five_plus() {
        assert_eq!(CostBin::of(Some(7)), CostBin::FivePlus);
        assert_eq!(CostBin::of(Some(4)), CostBin::Four);
        assert_eq!(CostBin::of(None), CostBin::Zero);
    }
}
