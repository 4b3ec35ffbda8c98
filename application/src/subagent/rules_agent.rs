//! Rules specialist: answers card-legality and ruling questions by
//! combining corpus retrieval with the deterministic legality predicate
//! (spec §4.3).

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use advisor_domain::{
    check_legality, unknown_decision, AgentDiagnostics, AgentKind, AgentPayload, Card, Citation,
    LegalityContext, LegalityDecision, RetrievalFilters, SubagentRequest, SubagentResponse, Verdict,
};
use async_trait::async_trait;

use crate::ports::{CardStore, CorpusRetriever};
use crate::subagent::framework::{compute_bounded, Subagent};

/// Retrieval truncation (spec §4.3, `[retrieval].top_k` default in
/// SPEC_FULL.md §4.9).
const TOP_K: usize = 8;

/// Minimum card-name length eligible for free-text substring extraction,
/// to avoid false positives on very short titles.
const MIN_NAME_LEN: usize = 3;

pub struct RulesAgent {
    retriever: Arc<dyn CorpusRetriever>,
    cards: Arc<dyn CardStore>,
    top_k: usize,
}

impl RulesAgent {
    pub fn new(retriever: Arc<dyn CorpusRetriever>, cards: Arc<dyn CardStore>) -> Self {
        Self { retriever, cards, top_k: TOP_K }
    }

    /// Overrides the retrieval truncation, for callers wiring in
    /// `[retrieval].top_k` from config instead of the built-in default.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Finds cards named in the free-text message (spec §4.3: a rules
    /// question can name a card in prose with no structured `deck_cards`).
    async fn cards_named_in_message(&self, message: &str) -> Vec<Card> {
        let lower = message.to_lowercase();
        let pool = self
            .cards
            .search_cards(&advisor_domain::CardPredicate::default())
            .await
            .unwrap_or_default();
        pool.into_iter()
            .filter(|card| card.name.len() >= MIN_NAME_LEN && lower.contains(&card.name.to_lowercase()))
            .collect()
    }
}

#[async_trait]
impl Subagent for RulesAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Rules
    }

    async fn run(&self, request: &SubagentRequest) -> SubagentResponse {
        let started = Instant::now();
        let filters = RetrievalFilters {
            source_ids: Vec::new(),
            investigator_code: request.investigator_id.clone(),
        };

        let lexical = self.retriever.lexical_search(&request.message, &filters).await;
        let semantic = self.retriever.semantic_search(&request.message, &filters).await;

        let (lexical, semantic) = match (lexical, semantic) {
            (Ok(l), Ok(s)) => (l, s),
            (Err(e), _) | (_, Err(e)) => {
                let mut response =
                    SubagentResponse::empty_error(AgentKind::Rules, "", "retrieval_unavailable");
                response.diagnostics.extra.insert("detail".into(), e.to_string());
                return response;
            }
        };

        let mut scored: Vec<_> = lexical
            .into_iter()
            .chain(semantic)
            .map(|s| (s.chunk.clone(), s.combined_score(0.5, 0.5)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.dedup_by(|a, b| a.0.key() == b.0.key());
        scored.truncate(self.top_k);

        let citations: Vec<Citation> = scored
            .iter()
            .map(|(chunk, _)| Citation {
                source_id: chunk.source_id.clone(),
                section_path: chunk.section_path.clone(),
                excerpt: chunk.text.chars().take(240).collect(),
            })
            .collect();
        let top_3_hits = scored.len().min(3) as u32;

        // Gather every card referenced by the request, whether structured
        // (`deck_cards`) or named in the message's prose, deduped by code.
        let mut referenced: Vec<(String, u32)> = request
            .deck_cards
            .as_ref()
            .map(|d| d.iter().map(|(code, &n)| (code.clone(), n)).collect())
            .unwrap_or_default();
        let mut seen_codes: BTreeSet<String> = referenced.iter().map(|(c, _)| c.clone()).collect();
        for card in self.cards_named_in_message(&request.message).await {
            if seen_codes.insert(card.code.clone()) {
                referenced.push((card.code, 1));
            }
        }

        let mut legality_decisions: Vec<LegalityDecision> = Vec::new();
        let mut deterministic_decisions = 0u32;

        if !referenced.is_empty() {
            if let Some(inv_code) = request.investigator_id.as_deref() {
                match self.cards.get_investigator(inv_code).await {
                    Ok(Some(investigator)) => {
                        let owned: Option<BTreeSet<String>> = request
                            .owned_sets
                            .as_ref()
                            .map(|v| v.iter().cloned().collect());
                        for (code, copies) in &referenced {
                            match self.cards.get_card(code).await {
                                Ok(Some(card)) => {
                                    let ctx = LegalityContext {
                                        taboo_mode: request.taboo_mode,
                                        current_copies: copies.saturating_sub(1),
                                        owned_sets: owned.as_ref(),
                                        ..Default::default()
                                    };
                                    legality_decisions.push(check_legality(&investigator, &card, &ctx));
                                    deterministic_decisions += 1;
                                }
                                _ => legality_decisions.push(unknown_decision(code, "card not found")),
                            }
                        }
                    }
                    _ => {
                        // Investigator unresolvable: RulesAgent never fails
                        // outright (spec §8 boundary) — every referenced
                        // card gets an `unknown` verdict instead.
                        for (code, _) in &referenced {
                            legality_decisions.push(unknown_decision(code, "investigator not found"));
                        }
                        let content = format!(
                            "Could not resolve investigator {inv_code}; legality of referenced card(s) is unknown."
                        );
                        let confidence = compute_bounded(0.2);
                        return SubagentResponse {
                            agent: AgentKind::Rules,
                            content,
                            confidence,
                            payload: AgentPayload::Rules { legality_decisions },
                            citations,
                            diagnostics: AgentDiagnostics {
                                duration_ms: started.elapsed().as_millis() as u64,
                                retrieval_hits: scored.len() as u32,
                                ..Default::default()
                            },
                            relevance: 1.0,
                        };
                    }
                }
            } else {
                for (code, _) in &referenced {
                    legality_decisions.push(unknown_decision(code, "no investigator specified"));
                }
            }
        }

        let denied = legality_decisions
            .iter()
            .filter(|d| matches!(d.verdict, Verdict::Deny))
            .count();
        let content = if legality_decisions.is_empty() {
            format!(
                "Found {} relevant rules passages for: {}",
                citations.len(),
                request.message
            )
        } else {
            format!(
                "Checked {} cards against deckbuilding rules; {} denied.",
                legality_decisions.len(),
                denied
            )
        };

        // compute_bounded(base 0.7, +0.1 per deterministic decision, +0.05
        // per top-3 retrieval hit, cap 0.95) (spec §4.3).
        let raw_confidence = 0.7 + 0.1 * deterministic_decisions as f32 + 0.05 * top_3_hits as f32;
        let confidence = compute_bounded(raw_confidence.min(0.95));

        SubagentResponse {
            agent: AgentKind::Rules,
            content,
            confidence,
            payload: AgentPayload::Rules { legality_decisions },
            citations,
            diagnostics: AgentDiagnostics {
                duration_ms: started.elapsed().as_millis() as u64,
                retrieval_hits: scored.len() as u32,
                ..Default::default()
            },
            relevance: 1.0,
        }
    }
}
