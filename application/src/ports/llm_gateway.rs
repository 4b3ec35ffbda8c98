//! LLM synthesis gateway port (spec §6)

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("LLM request timed out")]
    Timeout,
    #[error("LLM transport error: {0}")]
    Transport(String),
    #[error("LLM returned an unparsable response: {0}")]
    InvalidResponse(String),
}

/// A single completion request. `schema` is an optional JSON Schema the
/// gateway should ask the model to conform to; implementations that
/// cannot enforce a schema may ignore it and let the caller validate.
#[derive(Debug, Clone)]
pub struct LlmPrompt {
    pub system: Option<String>,
    pub user: String,
    pub schema: Option<Value>,
    pub max_tokens: Option<u32>,
}

impl LlmPrompt {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            schema: None,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }
}

#[derive(Debug, Clone)]
pub struct LlmOutput {
    pub text: String,
    pub structured: Option<Value>,
}

/// Any text-completion backend capable of synthesizing subagent
/// findings into a final answer (spec §4.6). Implementations are
/// swappable: an HTTP-backed provider, a local model, or a deterministic
/// mock for tests.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn complete(&self, prompt: LlmPrompt) -> Result<LlmOutput, GatewayError>;
}
