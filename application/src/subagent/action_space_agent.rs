//! Card search specialist: proposes legal, capability-matched candidates
//! from the full card pool (spec §4.5). Shares the same legality
//! predicate as `RulesAgent` so the two never disagree on a given card.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use advisor_domain::{
    archetype_fit, check_legality, score_archetypes, tag_card, AgentDiagnostics, AgentKind,
    AgentPayload, Archetype, CapabilityTag, Candidate, Card, CardPredicate, LegalityContext,
    SubagentRequest, SubagentResponse, Verdict,
};
use async_trait::async_trait;

use crate::ports::CardStore;
use crate::subagent::framework::{compute_bounded, Subagent};

/// Top-K truncation (spec §4.5 step 5, `[action_space].top_k` default in
/// SPEC_FULL.md §4.9).
const TOP_K: usize = 25;

/// Scoring weights for `score = alpha*capability_match + beta*cost_fit +
/// gamma*archetype_alignment + delta*economy_bonus` (spec §4.5 step 4).
const ALPHA_CAPABILITY: f32 = 0.45;
const BETA_COST: f32 = 0.20;
const GAMMA_ARCHETYPE: f32 = 0.20;
const DELTA_ECONOMY: f32 = 0.15;

/// Cost beyond which `cost_fit` bottoms out at 0 — one above the top cost
/// bin (spec §4.4's cost bins run 0..5+).
const MAX_REASONABLE_COST: f32 = 6.0;

/// Keyword -> capability dictionary used to seed needs from the user
/// message when no deck is present to derive gaps from (spec §4.5 step 1).
const KEYWORD_CAPABILITIES: &[(&str, CapabilityTag)] = &[
    ("combat", CapabilityTag::Combat),
    ("fight", CapabilityTag::Combat),
    ("evade", CapabilityTag::Evade),
    ("agility", CapabilityTag::Evade),
    ("clue", CapabilityTag::Clue),
    ("investigate", CapabilityTag::Clue),
    ("soak", CapabilityTag::SoakDamage),
    ("horror", CapabilityTag::SoakHorror),
    ("heal", CapabilityTag::Healing),
    ("draw", CapabilityTag::Draw),
    ("economy", CapabilityTag::Economy),
    ("resource", CapabilityTag::Economy),
    ("money", CapabilityTag::Economy),
    ("move", CapabilityTag::Movement),
    ("movement", CapabilityTag::Movement),
    ("support", CapabilityTag::Support),
    ("cancel", CapabilityTag::Mitigation),
    ("mitigate", CapabilityTag::Mitigation),
];

pub struct ActionSpaceAgent {
    cards: Arc<dyn CardStore>,
    top_k: usize,
    alpha: f32,
    beta: f32,
    gamma: f32,
    delta: f32,
}

impl ActionSpaceAgent {
    pub fn new(cards: Arc<dyn CardStore>) -> Self {
        Self {
            cards,
            top_k: TOP_K,
            alpha: ALPHA_CAPABILITY,
            beta: BETA_COST,
            gamma: GAMMA_ARCHETYPE,
            delta: DELTA_ECONOMY,
        }
    }

    /// Overrides the scoring weights and truncation, for callers wiring in
    /// `[action_space]` from config instead of the built-in defaults.
    pub fn with_weights(mut self, top_k: usize, alpha: f32, beta: f32, gamma: f32, delta: f32) -> Self {
        self.top_k = top_k;
        self.alpha = alpha;
        self.beta = beta;
        self.gamma = gamma;
        self.delta = delta;
        self
    }

    /// Resolves the current deck (if any) to cards, for both needs-seeding
    /// and archetype alignment.
    async fn resolve_deck(&self, request: &SubagentRequest) -> Vec<Card> {
        let Some(deck_cards) = request.deck_cards.as_ref() else {
            return Vec::new();
        };
        let mut resolved = Vec::new();
        for (code, &count) in deck_cards {
            if let Ok(Some(card)) = self.cards.get_card(code).await {
                for _ in 0..count {
                    resolved.push(card.clone());
                }
            }
        }
        resolved
    }

    /// Step 1: seed needed capabilities from the deck's gap list, falling
    /// back to keyword extraction from the message (spec §4.5 step 1).
    fn seed_needs(deck: &[Card], request: &SubagentRequest) -> Vec<CapabilityTag> {
        if !deck.is_empty() {
            let mut coverage: BTreeMap<CapabilityTag, u32> = BTreeMap::new();
            for card in deck {
                for tag in tag_card(card) {
                    *coverage.entry(tag).or_insert(0) += 1;
                }
            }
            let gaps: Vec<CapabilityTag> = CapabilityTag::ALL
                .into_iter()
                .filter(|tag| coverage.get(tag).copied().unwrap_or(0) < tag.expected_coverage(request.player_count))
                .collect();
            if !gaps.is_empty() {
                return gaps;
            }
        }

        let message = request.message.to_lowercase();
        let mut needs: Vec<CapabilityTag> = KEYWORD_CAPABILITIES
            .iter()
            .filter(|(kw, _)| message.contains(kw))
            .map(|(_, tag)| *tag)
            .collect();
        needs.sort();
        needs.dedup();
        needs
    }

    fn cost_fit(card: &Card) -> f32 {
        let cost = card.cost.unwrap_or(0).max(0) as f32;
        (1.0 - (cost / MAX_REASONABLE_COST)).clamp(0.0, 1.0)
    }

    fn score_candidate(
        &self,
        card: &Card,
        matched: &[CapabilityTag],
        needed: &[CapabilityTag],
        deck_archetype: Option<Archetype>,
    ) -> f32 {
        let capability_match = if needed.is_empty() {
            matched.len() as f32 / CapabilityTag::ALL.len() as f32
        } else {
            (matched.iter().filter(|tag| needed.contains(tag)).count() as f32 / needed.len() as f32).min(1.0)
        };
        let cost_fit = Self::cost_fit(card);
        let archetype_alignment = match deck_archetype {
            Some(archetype) => archetype_fit(card, archetype),
            None => 0.5,
        };
        let economy_bonus = if matched.contains(&CapabilityTag::Economy) { 1.0 } else { 0.0 };

        self.alpha * capability_match
            + self.beta * cost_fit
            + self.gamma * archetype_alignment
            + self.delta * economy_bonus
    }
}

#[async_trait]
impl Subagent for ActionSpaceAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::ActionSpace
    }

    async fn run(&self, request: &SubagentRequest) -> SubagentResponse {
        let started = Instant::now();
        let Some(inv_code) = request.investigator_id.as_deref() else {
            let mut response =
                SubagentResponse::empty_error(AgentKind::ActionSpace, "", "no_investigator");
            response.diagnostics.duration_ms = started.elapsed().as_millis() as u64;
            return response;
        };

        let investigator = match self.cards.get_investigator(inv_code).await {
            Ok(Some(inv)) => inv,
            _ => {
                let mut response =
                    SubagentResponse::empty_error(AgentKind::ActionSpace, "", "investigator_not_found");
                response.diagnostics.duration_ms = started.elapsed().as_millis() as u64;
                return response;
            }
        };

        let predicate = CardPredicate {
            max_xp: request.upgrade_xp.map(|x| x as u8),
            ..Default::default()
        };

        let pool = match self.cards.search_cards(&predicate).await {
            Ok(cards) => cards,
            Err(e) => {
                let mut response =
                    SubagentResponse::empty_error(AgentKind::ActionSpace, "", "store_unavailable");
                response.diagnostics.extra.insert("detail".into(), e.to_string());
                return response;
            }
        };

        let owned: Option<BTreeSet<String>> = request
            .owned_sets
            .as_ref()
            .map(|v| v.iter().cloned().collect());
        let already_in_deck: BTreeSet<String> = request
            .deck_cards
            .as_ref()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default();

        let deck = self.resolve_deck(request).await;
        let needed = Self::seed_needs(&deck, request);
        let deck_archetype = score_archetypes(&deck).into_iter().find(|(_, score)| *score > 0.0).map(|(a, _)| a);

        let mut applied_filters = vec!["legal-for-investigator".to_string()];
        if request.upgrade_xp.is_some() {
            applied_filters.push("xp-budget".to_string());
        }
        if owned.is_some() {
            applied_filters.push("owned-sets".to_string());
        }
        if !needed.is_empty() {
            applied_filters.push("capability-needs".to_string());
        }

        let mut candidates: Vec<Candidate> = pool
            .into_iter()
            .filter(|card| !already_in_deck.contains(&card.code))
            .filter_map(|card| {
                let ctx = LegalityContext {
                    taboo_mode: request.taboo_mode,
                    xp_budget: request.upgrade_xp,
                    owned_sets: owned.as_ref(),
                    ..Default::default()
                };
                let decision = check_legality(&investigator, &card, &ctx);
                if decision.verdict != Verdict::Allow {
                    return None;
                }
                let matched = tag_card(&card);
                if !needed.is_empty() && !matched.iter().any(|tag| needed.contains(tag)) {
                    return None;
                }
                let score = self.score_candidate(&card, &matched, &needed, deck_archetype);
                Some(Candidate {
                    copy_limit: card.copy_limit() as u32,
                    is_signature: investigator.required_signatures.contains(&card.code),
                    code: card.code,
                    name: card.name,
                    score,
                    matched_capabilities: matched,
                    reason: decision.reason,
                })
            })
            .collect();

        // Signature cards are always surfaced when legal and not already
        // in the deck, independent of how they score against the needs
        // dictionary (spec §4.1 DeckProposal "signature cards present").
        let seen: BTreeSet<String> = candidates.iter().map(|c| c.code.clone()).collect();
        for sig_code in &investigator.required_signatures {
            if seen.contains(sig_code) || already_in_deck.contains(sig_code) {
                continue;
            }
            if let Ok(Some(card)) = self.cards.get_card(sig_code).await {
                let ctx = LegalityContext {
                    taboo_mode: request.taboo_mode,
                    xp_budget: request.upgrade_xp,
                    owned_sets: owned.as_ref(),
                    ..Default::default()
                };
                let decision = check_legality(&investigator, &card, &ctx);
                if decision.verdict != Verdict::Allow {
                    continue;
                }
                let matched = tag_card(&card);
                let score = self.score_candidate(&card, &matched, &needed, deck_archetype);
                let copy_limit = card.copy_limit() as u32;
                candidates.push(Candidate {
                    code: card.code,
                    name: card.name,
                    score,
                    matched_capabilities: matched,
                    reason: "investigator signature card".to_string(),
                    copy_limit,
                    is_signature: true,
                });
            }
        }

        candidates.sort_by(|a, b| {
            b.is_signature
                .cmp(&a.is_signature)
                .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal))
        });
        candidates.truncate(self.top_k);

        let content = format!("{} legal candidate(s) found", candidates.len());
        let raw_confidence =
            0.6 + (candidates.len() as f32 * 0.01).min(0.3) - if candidates.len() < 5 { 0.2 } else { 0.0 };
        let confidence = compute_bounded(raw_confidence);

        SubagentResponse {
            agent: AgentKind::ActionSpace,
            content,
            confidence,
            payload: AgentPayload::ActionSpace { candidates, applied_filters },
            citations: Vec::new(),
            diagnostics: AgentDiagnostics {
                duration_ms: started.elapsed().as_millis() as u64,
                ..Default::default()
            },
            relevance: 1.0,
        }
    }
}
