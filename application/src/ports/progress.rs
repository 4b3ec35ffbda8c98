//! Orchestration progress notifications (spec §4, ambient observability)

use advisor_domain::{AgentKind, OrchestratorPhase};

/// Optional sink for human-facing progress updates as a request moves
/// through the orchestrator's phases. The CLI binds this to a console
/// reporter; tests bind it to a no-op.
pub trait ProgressNotifier: Send + Sync {
    fn phase_changed(&self, phase: OrchestratorPhase) {
        let _ = phase;
    }

    fn agent_dispatched(&self, agent: AgentKind) {
        let _ = agent;
    }

    fn agent_completed(&self, agent: AgentKind, elapsed_ms: u64) {
        let _ = (agent, elapsed_ms);
    }
}

/// A `ProgressNotifier` that discards every event.
pub struct NullProgressNotifier;

impl ProgressNotifier for NullProgressNotifier {}
