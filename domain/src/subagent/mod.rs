//! Subagent request/response contract shared by every analyzer

pub mod entities;

pub use entities::{
    AgentDiagnostics, AgentKind, AgentPayload, Citation, MulliganStrategy, SubagentRequest,
    SubagentResponse,
};
