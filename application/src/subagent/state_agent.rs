//! Deck composition analyst: summarizes an existing decklist's shape and
//! flags role-coverage gaps (spec §4.4).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use advisor_domain::{
    score_archetypes, tag_card, AgentDiagnostics, AgentKind, AgentPayload, Card, CapabilityTag,
    CompositionSummary, CostBin, CostCurveStats, SkillTotals, SubagentRequest, SubagentResponse,
};
use async_trait::async_trait;

use crate::ports::CardStore;
use crate::subagent::framework::{compute_bounded, Subagent};

pub struct StateAgent {
    cards: Arc<dyn CardStore>,
}

impl StateAgent {
    pub fn new(cards: Arc<dyn CardStore>) -> Self {
        Self { cards }
    }
}

fn percentile(sorted_costs: &[i32], pct: f32) -> f32 {
    if sorted_costs.is_empty() {
        return 0.0;
    }
    let rank = ((sorted_costs.len() as f32 - 1.0) * pct).round() as usize;
    sorted_costs[rank.min(sorted_costs.len() - 1)] as f32
}

fn summarize(cards: &[(Card, u32)], player_count: u32) -> CompositionSummary {
    let mut summary = CompositionSummary::default();
    let mut costs = Vec::new();
    let mut resolved_cards = Vec::new();

    for (card, count) in cards {
        if !card.counts_toward_deck_size() {
            continue;
        }
        summary.total_cards += count;
        *summary.by_type.entry(card.card_type).or_insert(0) += count;
        for faction in &card.factions {
            *summary.by_faction.entry(*faction).or_insert(0) += count;
        }
        let bin = CostBin::of(card.cost);
        *summary.by_cost_bin.entry(bin).or_insert(0) += count;
        for _ in 0..*count {
            costs.push(card.cost.unwrap_or(0).max(0));
        }

        summary.skill_totals.willpower += card.skill_icons.willpower as u32 * count;
        summary.skill_totals.intellect += card.skill_icons.intellect as u32 * count;
        summary.skill_totals.combat += card.skill_icons.combat as u32 * count;
        summary.skill_totals.agility += card.skill_icons.agility as u32 * count;
        summary.skill_totals.wild += card.skill_icons.wild as u32 * count;

        for tag in tag_card(card) {
            *summary.role_coverage.entry(tag).or_insert(0) += count;
        }

        for _ in 0..*count {
            resolved_cards.push(card.clone());
        }
    }

    costs.sort_unstable();
    if !costs.is_empty() {
        let mean = costs.iter().sum::<i32>() as f32 / costs.len() as f32;
        let top_heavy = costs.iter().filter(|&&c| c >= 4).count() as f32 / costs.len() as f32;
        summary.cost_curve = CostCurveStats {
            mean,
            median: percentile(&costs, 0.5),
            p90: percentile(&costs, 0.9),
            top_heaviness: top_heavy,
        };
    }

    for tag in CapabilityTag::ALL {
        let have = summary.role_coverage.get(&tag).copied().unwrap_or(0);
        if have < tag.expected_coverage(player_count) {
            summary.gaps.push(tag);
        }
    }

    let scored = score_archetypes(&resolved_cards);
    if let Some((archetype, score)) = scored.into_iter().find(|(_, s)| *s > 0.0) {
        summary.archetype_hypothesis = Some(archetype);
        summary.archetype_score = score;
    }

    summary
}

#[async_trait]
impl Subagent for StateAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::State
    }

    async fn run(&self, request: &SubagentRequest) -> SubagentResponse {
        let started = Instant::now();

        // StateAgent never fails: a missing deck yields a well-formed
        // empty composition rather than an error response (spec §4.4
        // Errors).
        let Some(deck_cards) = request.deck_cards.as_ref() else {
            let mut summary = CompositionSummary::default();
            summary.note = Some("deck not provided".to_string());
            return SubagentResponse {
                agent: AgentKind::State,
                content: "No deck supplied; nothing to analyze.".to_string(),
                confidence: compute_bounded(0.1),
                payload: AgentPayload::State { composition: summary },
                citations: Vec::new(),
                diagnostics: AgentDiagnostics {
                    duration_ms: started.elapsed().as_millis() as u64,
                    ..Default::default()
                },
                relevance: 1.0,
            };
        };

        let investigator_unknown = match request.investigator_id.as_deref() {
            Some(code) => !matches!(self.cards.get_investigator(code).await, Ok(Some(_))),
            None => true,
        };

        let mut resolved: Vec<(Card, u32)> = Vec::new();
        let mut unresolved: BTreeMap<String, u32> = BTreeMap::new();
        for (code, &count) in deck_cards {
            match self.cards.get_card(code).await {
                Ok(Some(card)) => resolved.push((card, count)),
                _ => {
                    unresolved.insert(code.clone(), count);
                }
            }
        }

        let mut summary = summarize(&resolved, request.player_count);
        if !unresolved.is_empty() {
            summary.note = Some(format!("{} card code(s) could not be resolved", unresolved.len()));
        }

        let content = format!(
            "{} cards, {} gap(s) in role coverage: {}",
            summary.total_cards,
            summary.gaps.len(),
            summary
                .gaps
                .iter()
                .map(|g| g.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        // compute_bounded(base 0.9, -0.2 if card count < 15, -0.3 if
        // investigator unknown) (spec §4.4).
        let raw_confidence = 0.9
            - if summary.total_cards < 15 { 0.2 } else { 0.0 }
            - if investigator_unknown { 0.3 } else { 0.0 };
        let confidence = compute_bounded(raw_confidence);

        SubagentResponse {
            agent: AgentKind::State,
            content,
            confidence,
            payload: AgentPayload::State { composition: summary },
            citations: Vec::new(),
            diagnostics: AgentDiagnostics {
                duration_ms: started.elapsed().as_millis() as u64,
                ..Default::default()
            },
            relevance: 1.0,
        }
    }
}
