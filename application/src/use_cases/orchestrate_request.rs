//! The orchestrator graph: classify -> select -> fanout -> aggregate ->
//! synthesize (spec §4.1).

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use advisor_domain::{
    AdvisoryResponse, AgentKind, DeckProposal, DeckProposalCard, OrchestratorMetadata,
    OrchestratorOutput, OrchestratorPhase, OrchestratorState, QueryType, SubagentRequest,
    SubagentResponse, SubagentSummary,
};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::ports::{GatewayError, LlmGateway, LlmPrompt, ProgressNotifier};
use crate::prompt::PromptTemplate;
use crate::subagent::Subagent;

#[derive(Debug, Error)]
pub enum OrchestrateError {
    #[error("request was cancelled")]
    Cancelled,
    #[error("orchestrator state transition failed: {0}")]
    BadTransition(#[from] advisor_domain::DomainError),
}

/// Per-agent and global fan-out budgets (spec §4.1, surfaced as config in
/// `[orchestrator]`, see SPEC_FULL.md §4.9).
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorBudgets {
    pub per_agent_timeout: Duration,
    pub global_timeout: Duration,
    pub synthesizer_retries: u32,
}

impl Default for OrchestratorBudgets {
    fn default() -> Self {
        Self {
            per_agent_timeout: Duration::from_secs(20),
            global_timeout: Duration::from_secs(45),
            synthesizer_retries: 1,
        }
    }
}

/// Classifies a request into a `QueryType` per the fixed precedence of
/// structured-field hints, then keyword table, then priority tie-break
/// (spec §4.1 Classify).
fn classify(request: &SubagentRequest) -> QueryType {
    let mut candidates = Vec::new();

    if request.scenario_name.is_some() {
        candidates.push(QueryType::Scenario);
    }
    if request.upgrade_xp.is_some() {
        candidates.push(QueryType::Search);
    }

    let message = request.message.to_lowercase();
    const RULES_WORDS: &[&str] = &["legal", "include", "taboo", "allowed"];
    const ANALYZE_WORDS: &[&str] = &["analyze", "gaps", "curve", "balance"];
    const SEARCH_WORDS: &[&str] = &["find", "recommend", "suggest", "upgrade"];
    const SCENARIO_WORDS: &[&str] = &["scenario", "prepare", "threats"];
    const BUILD_WORDS: &[&str] = &["build", "new deck", "starter"];

    let has_any = |words: &[&str]| words.iter().any(|w| message.contains(w));

    if has_any(RULES_WORDS) {
        candidates.push(QueryType::Rules);
    }
    if has_any(ANALYZE_WORDS) {
        candidates.push(QueryType::Analyze);
    }
    if has_any(SEARCH_WORDS) {
        candidates.push(QueryType::Search);
    }
    if has_any(SCENARIO_WORDS) {
        candidates.push(QueryType::Scenario);
    }
    if has_any(BUILD_WORDS) {
        candidates.push(QueryType::BuildDeck);
    }

    QueryType::highest_priority(&candidates)
}

/// Maps a classification to the agent set to fan out to (spec §4.1
/// Select). Classification is advisory — multiple agents may run even
/// when only one would directly answer the query type.
fn select_agents(query_type: QueryType, request: &SubagentRequest) -> Vec<AgentKind> {
    let mut agents = match query_type {
        QueryType::Rules => vec![AgentKind::Rules],
        QueryType::Analyze => {
            let mut agents = vec![AgentKind::State];
            if request.investigator_id.is_none() || request.upgrade_xp.is_some() {
                agents.push(AgentKind::Rules);
            }
            agents
        }
        QueryType::Search => {
            let mut agents = vec![AgentKind::State, AgentKind::ActionSpace];
            if request.scenario_name.is_some() {
                agents.push(AgentKind::Scenario);
            }
            agents
        }
        QueryType::Scenario => {
            let mut agents = vec![AgentKind::Scenario];
            if request.deck_cards.is_some() {
                agents.push(AgentKind::State);
            }
            agents
        }
        QueryType::BuildDeck => {
            let mut agents = vec![AgentKind::Rules, AgentKind::ActionSpace, AgentKind::State];
            if request.scenario_name.is_some() {
                agents.push(AgentKind::Scenario);
            }
            agents
        }
        QueryType::General => vec![AgentKind::Rules],
    };
    agents.sort();
    agents.dedup();
    agents
}

/// Composes the four concrete subagents, the synthesis gateway, and the
/// fan-out budgets into the full orchestrator graph.
pub struct OrchestrateRequestUseCase {
    rules: Arc<dyn Subagent>,
    state: Arc<dyn Subagent>,
    action_space: Arc<dyn Subagent>,
    scenario: Arc<dyn Subagent>,
    gateway: Arc<dyn LlmGateway>,
    budgets: OrchestratorBudgets,
}

impl OrchestrateRequestUseCase {
    pub fn new(
        rules: Arc<dyn Subagent>,
        state: Arc<dyn Subagent>,
        action_space: Arc<dyn Subagent>,
        scenario: Arc<dyn Subagent>,
        gateway: Arc<dyn LlmGateway>,
        budgets: OrchestratorBudgets,
    ) -> Self {
        Self {
            rules,
            state,
            action_space,
            scenario,
            gateway,
            budgets,
        }
    }

    fn agent_handle(&self, kind: AgentKind) -> Arc<dyn Subagent> {
        match kind {
            AgentKind::Rules => self.rules.clone(),
            AgentKind::State => self.state.clone(),
            AgentKind::ActionSpace => self.action_space.clone(),
            AgentKind::Scenario => self.scenario.clone(),
        }
    }

    pub async fn execute(
        &self,
        request: SubagentRequest,
        progress: &dyn ProgressNotifier,
        cancellation: CancellationToken,
    ) -> Result<OrchestratorOutput, OrchestrateError> {
        let mut state = OrchestratorState::new(request);

        state.advance(OrchestratorPhase::Classifying)?;
        progress.phase_changed(state.phase);
        let query_type = classify(&state.request);
        state.classification = Some(query_type);
        info!(?query_type, "classified request");

        let selected = select_agents(query_type, &state.request);
        state.selected_agents = selected.clone();

        state.advance(OrchestratorPhase::Dispatched)?;
        progress.phase_changed(state.phase);

        let fanout = self.fanout(&state.request, &selected, progress, cancellation.clone());
        let responses = match timeout(self.budgets.global_timeout, fanout).await {
            Ok(responses) => responses,
            Err(_) => {
                state.advance(OrchestratorPhase::Failed)?;
                return Err(OrchestrateError::Cancelled);
            }
        };

        if cancellation.is_cancelled() {
            state.advance(OrchestratorPhase::Cancelled)?;
            return Err(OrchestrateError::Cancelled);
        }

        state.advance(OrchestratorPhase::Collecting)?;
        progress.phase_changed(state.phase);
        for response in responses {
            state.record_response(response);
        }

        state.advance(OrchestratorPhase::Synthesizing)?;
        progress.phase_changed(state.phase);
        let output = self.synthesize(&state, query_type).await;
        state.final_output = Some(output.clone());

        state.advance(OrchestratorPhase::Done)?;
        progress.phase_changed(state.phase);
        Ok(output)
    }

    async fn fanout(
        &self,
        request: &SubagentRequest,
        selected: &[AgentKind],
        progress: &dyn ProgressNotifier,
        cancellation: CancellationToken,
    ) -> Vec<SubagentResponse> {
        let mut join_set = JoinSet::new();

        for &kind in selected {
            let agent = self.agent_handle(kind);
            let request = request.clone();
            let per_agent_timeout = self.budgets.per_agent_timeout;
            let token = cancellation.clone();
            progress.agent_dispatched(kind);

            join_set.spawn(async move {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        SubagentResponse::empty_error(kind, "", "cancelled")
                    }
                    result = timeout(per_agent_timeout, agent.run(&request)) => {
                        match result {
                            Ok(response) => response,
                            Err(_) => SubagentResponse::empty_error(kind, "", "timeout"),
                        }
                    }
                }
            });
        }

        let mut responses = Vec::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(response) => {
                    progress.agent_completed(response.agent, response.diagnostics.duration_ms);
                    responses.push(response);
                }
                Err(e) => warn!("subagent task join error: {}", e),
            }
        }
        responses
    }

    async fn synthesize(&self, state: &OrchestratorState, query_type: QueryType) -> OrchestratorOutput {
        let responses: Vec<SubagentResponse> = state.responses.values().cloned().collect();

        if query_type == QueryType::BuildDeck {
            if let Some(proposal) = self.try_build_deck_proposal(state, &responses) {
                return OrchestratorOutput::DeckProposal(proposal);
            }
        }

        OrchestratorOutput::Advisory(self.build_advisory(state, &responses).await)
    }

    fn try_build_deck_proposal(
        &self,
        state: &OrchestratorState,
        responses: &[SubagentResponse],
    ) -> Option<DeckProposal> {
        let action_space = responses
            .iter()
            .find(|r| r.agent == AgentKind::ActionSpace)?;
        let advisor_domain::AgentPayload::ActionSpace { candidates, .. } = &action_space.payload
        else {
            return None;
        };

        let investigator_id = state.request.investigator_id.clone()?;
        let investigator_name = state
            .request
            .investigator_name
            .clone()
            .unwrap_or_else(|| investigator_id.clone());

        let deck_size_target = 30u32;

        // A candidate's effective multiplicity in the proposal: forced
        // signature inclusions always count 1 (spec §3 unique cards),
        // everything else uses its real per-title copy limit.
        let effective_limit = |c: &advisor_domain::Candidate| if c.is_signature { 1 } else { c.copy_limit };

        let mut seen: BTreeSet<String> = BTreeSet::new();
        let deduped: Vec<&advisor_domain::Candidate> = candidates
            .iter()
            .filter(|c| seen.insert(c.code.clone()))
            .collect();

        // Gate: only emit a proposal when the candidate pool can actually
        // fill the investigator's deck size (spec §4.1 "ActionSpaceAgent
        // returned enough candidates", §8 "sum(cards[*].quantity) equals
        // the deck size").
        let available_total: u32 = deduped.iter().map(|c| effective_limit(c)).sum();
        if available_total < deck_size_target {
            return None;
        }

        let mut cards = Vec::new();
        let mut total = 0u32;
        for candidate in deduped {
            if total >= deck_size_target {
                break;
            }
            let quantity = effective_limit(candidate).min(deck_size_target - total);
            if quantity == 0 {
                continue;
            }
            total += quantity;
            let category = candidate
                .matched_capabilities
                .first()
                .copied()
                .unwrap_or(advisor_domain::CapabilityTag::Support);
            cards.push(DeckProposalCard {
                card_id: candidate.code.clone(),
                name: candidate.name.clone(),
                quantity,
                category,
                reason: candidate.reason.clone(),
            });
        }

        if cards.is_empty() {
            return None;
        }

        let archetype = responses
            .iter()
            .find_map(|r| match &r.payload {
                advisor_domain::AgentPayload::State { composition } => {
                    composition.archetype_hypothesis.map(|a| a.as_str().to_string())
                }
                _ => None,
            });

        Some(DeckProposal {
            deck_name: format!("{investigator_name} advisor draft"),
            investigator_id,
            investigator_name,
            total_cards: total,
            cards,
            reasoning: "Selected from legal, capability-scored candidates.".to_string(),
            archetype,
            warnings: Vec::new(),
            confidence: action_space.confidence,
        })
    }

    async fn build_advisory(
        &self,
        state: &OrchestratorState,
        responses: &[SubagentResponse],
    ) -> AdvisoryResponse {
        let mut metadata = OrchestratorMetadata {
            query_type: state.classification.map(|q| q.as_str().to_string()),
            agents_selected: state.selected_agents.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        };

        for response in responses {
            metadata
                .timings_ms
                .insert(response.agent.to_string(), response.diagnostics.duration_ms);
            if response.diagnostics.error {
                metadata.errors.push(format!(
                    "{}: {}",
                    response.agent,
                    response.diagnostics.error_kind.clone().unwrap_or_default()
                ));
            }
        }

        let subagent_results: Vec<SubagentSummary> = responses
            .iter()
            .map(|r| SubagentSummary {
                agent: r.agent.to_string(),
                confidence: r.confidence,
                summary: r.content.clone(),
                error: r.diagnostics.error,
            })
            .collect();

        let confidence = if responses.is_empty() {
            0.0
        } else {
            responses.iter().map(|r| r.confidence * r.relevance).sum::<f32>()
                / responses.iter().map(|r| r.relevance).sum::<f32>().max(0.001)
        };

        let synthesis_prompt = LlmPrompt::new(PromptTemplate::synthesis_user(&state.request, responses))
            .with_system(PromptTemplate::synthesis_system().to_string());

        let mut content = None;
        let mut degraded = false;
        for _ in 0..=self.budgets.synthesizer_retries {
            match self.gateway.complete(synthesis_prompt.clone()).await {
                Ok(output) => {
                    content = Some(output.text);
                    break;
                }
                Err(GatewayError::Timeout) | Err(GatewayError::Transport(_)) => {
                    degraded = true;
                    continue;
                }
                Err(e) => {
                    warn!("synthesis gateway error: {}", e);
                    degraded = true;
                    break;
                }
            }
        }

        // Decided per Open Question (c): on synthesis failure, degrade to
        // a concatenation of per-agent summaries rather than fail the
        // request outright.
        let content = content.unwrap_or_else(|| {
            responses
                .iter()
                .map(|r| format!("{}: {}", r.agent, r.content))
                .collect::<Vec<_>>()
                .join("\n")
        });
        metadata.synthesizer_degraded = degraded;

        let recommendation = responses.iter().find_map(|r| match &r.payload {
            advisor_domain::AgentPayload::State { composition } if !composition.gaps.is_empty() => {
                Some(format!(
                    "Consider adding coverage for: {}",
                    composition
                        .gaps
                        .iter()
                        .map(|g| g.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            }
            _ => None,
        });

        AdvisoryResponse {
            content,
            recommendation,
            confidence,
            agents_consulted: responses.iter().map(|r| r.agent.to_string()).collect(),
            subagent_results,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_build_deck_on_tie() {
        let mut request = SubagentRequest::new("build a new deck that is legal and lets me find cards");
        request.scenario_name = None;
        assert_eq!(classify(&request), QueryType::BuildDeck);
    }

    #[test]
    fn classify_rules_question() {
        let request = SubagentRequest::new("is this card legal and allowed?");
        assert_eq!(classify(&request), QueryType::Rules);
    }

    #[test]
    fn classify_falls_back_to_general() {
        let request = SubagentRequest::new("hello there");
        assert_eq!(classify(&request), QueryType::General);
    }

    #[test]
    fn select_agents_for_build_deck_includes_scenario_when_present() {
        let mut request = SubagentRequest::new("build a new deck");
        request.scenario_name = Some("The Gathering".to_string());
        let agents = select_agents(QueryType::BuildDeck, &request);
        assert!(agents.contains(&AgentKind::Scenario));
        assert!(agents.contains(&AgentKind::Rules));
        assert!(agents.contains(&AgentKind::ActionSpace));
        assert!(agents.contains(&AgentKind::State));
    }

    #[test]
    fn select_agents_general_falls_back_to_rules() {
        let request = SubagentRequest::new("hello there");
        assert_eq!(select_agents(QueryType::General, &request), vec![AgentKind::Rules]);
    }
}
