//! Concrete subagents and the shared framework they're built on.

pub mod action_space_agent;
pub mod framework;
pub mod rules_agent;
pub mod scenario_agent;
pub mod state_agent;

pub use action_space_agent::ActionSpaceAgent;
pub use framework::{compute_bounded, CachedSubagent, RetryingSubagent, Subagent};
pub use rules_agent::RulesAgent;
pub use scenario_agent::ScenarioAgent;
pub use state_agent::StateAgent;
