//! Scenario preparation specialist: surfaces known threats for a named
//! scenario from the corpus (spec §4.6).

use std::sync::Arc;
use std::time::Instant;

use advisor_domain::{
    AgentDiagnostics, AgentKind, AgentPayload, Citation, RetrievalFilters, SubagentRequest,
    SubagentResponse, ThreatEntry,
};
use async_trait::async_trait;

use crate::ports::CorpusRetriever;
use crate::subagent::framework::{compute_bounded, Subagent};

const SKILL_KEYWORDS: &[&str] = &["willpower", "intellect", "combat", "agility"];

pub struct ScenarioAgent {
    retriever: Arc<dyn CorpusRetriever>,
}

impl ScenarioAgent {
    pub fn new(retriever: Arc<dyn CorpusRetriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Subagent for ScenarioAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Scenario
    }

    async fn run(&self, request: &SubagentRequest) -> SubagentResponse {
        let started = Instant::now();
        let Some(scenario_name) = request.scenario_name.as_deref() else {
            let mut response = SubagentResponse::empty_error(AgentKind::Scenario, "", "no_scenario");
            response.diagnostics.duration_ms = started.elapsed().as_millis() as u64;
            return response;
        };

        let filters = RetrievalFilters::default();
        let hits = match self.retriever.lexical_search(scenario_name, &filters).await {
            Ok(hits) => hits,
            Err(e) => {
                let mut response =
                    SubagentResponse::empty_error(AgentKind::Scenario, "", "retrieval_unavailable");
                response.diagnostics.extra.insert("detail".into(), e.to_string());
                return response;
            }
        };

        let mut threats = Vec::new();
        let mut recommended_traits = Vec::new();
        for scored in &hits {
            let text = scored.chunk.text.to_lowercase();
            for skill in SKILL_KEYWORDS {
                if text.contains(skill) {
                    threats.push(ThreatEntry {
                        skill: (*skill).to_string(),
                        severity: scored.combined_score(0.5, 0.5),
                        evidence_citation: Citation {
                            source_id: scored.chunk.source_id.clone(),
                            section_path: scored.chunk.section_path.clone(),
                            excerpt: scored.chunk.text.chars().take(240).collect(),
                        },
                    });
                }
            }
            if text.contains("horror") {
                recommended_traits.push("sanity-resilient".to_string());
            }
            if text.contains("combat") || text.contains("fight") {
                recommended_traits.push("combat-ready".to_string());
            }
        }
        recommended_traits.sort();
        recommended_traits.dedup();

        let content = format!(
            "Found {} threat signal(s) for scenario \"{}\"",
            threats.len(),
            scenario_name
        );
        let confidence = compute_bounded(if threats.is_empty() { 0.15 } else { 0.7 });

        SubagentResponse {
            agent: AgentKind::Scenario,
            content,
            confidence,
            payload: AgentPayload::Scenario { threats, recommended_traits },
            citations: Vec::new(),
            diagnostics: AgentDiagnostics {
                duration_ms: started.elapsed().as_millis() as u64,
                retrieval_hits: hits.len() as u32,
                ..Default::default()
            },
            relevance: 1.0,
        }
    }
}
