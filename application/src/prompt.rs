//! Prompt templates for subagent reasoning and final synthesis.

use advisor_domain::{AgentKind, SubagentRequest, SubagentResponse};

pub struct PromptTemplate;

impl PromptTemplate {
    pub fn agent_system(kind: AgentKind) -> &'static str {
        match kind {
            AgentKind::Rules => {
                r#"You are a rules specialist for the Arkham Horror Living Card Game.
Answer using only the deckbuilding and card-legality facts you are given.
Cite the rules passages you rely on. Do not invent card text or interactions."#
            }
            AgentKind::State => {
                r#"You are a deck composition analyst for the Arkham Horror Living Card Game.
Summarize the structural shape of a decklist: type mix, cost curve, and role
coverage. Call out gaps plainly. Do not recommend specific new cards."#
            }
            AgentKind::ActionSpace => {
                r#"You are a card search specialist for the Arkham Horror Living Card Game.
Given a set of legal, scored candidates, explain why each is a reasonable
addition. Never recommend a card outside the candidate list you were given."#
            }
            AgentKind::Scenario => {
                r#"You are a scenario preparation specialist for the Arkham Horror Living Card Game.
Given known scenario threats, describe the skill tests and resistances a
deck should prepare for. Cite the scenario notes you draw from."#
            }
        }
    }

    pub fn agent_user(kind: AgentKind, request: &SubagentRequest, evidence: &str) -> String {
        format!(
            "Request: {}\n\nInvestigator: {}\n\nEvidence:\n{}\n\nRespond as the {} specialist.",
            request.message,
            request.investigator_name.as_deref().unwrap_or("unspecified"),
            evidence,
            kind.name()
        )
    }

    pub fn synthesis_system() -> &'static str {
        r#"You are synthesizing findings from several specialist subagents into one
answer for a deckbuilder. Reconcile any disagreement in favor of the rules
and deck-composition agents. Keep the answer grounded in what the
subagents actually reported; never introduce a card or rule they did not
mention."#
    }

    pub fn synthesis_user(request: &SubagentRequest, responses: &[SubagentResponse]) -> String {
        let mut prompt = format!("Original request: {}\n\nSubagent findings:\n", request.message);
        for response in responses {
            prompt.push_str(&format!(
                "\n--- {} (confidence {:.2}) ---\n{}\n",
                response.agent, response.confidence, response.content
            ));
        }
        prompt.push_str("\nWrite a concise, well-organized final answer.");
        prompt
    }
}
