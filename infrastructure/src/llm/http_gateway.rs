//! HTTP-backed LLM gateway (spec §4.9): a minimal OpenAI-chat-completions
//! style client. The API credential is read from the environment at
//! construction time and never stored in the typed config struct.

use std::time::Duration;

use advisor_application::ports::{GatewayError, LlmGateway, LlmOutput, LlmPrompt};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

const CREDENTIAL_ENV_VAR: &str = "DECK_ADVISOR_LLM_API_KEY";

pub struct HttpLlmGateway {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpLlmGateway {
    /// Build a gateway from config-supplied endpoint/model/timeout plus the
    /// credential read from `DECK_ADVISOR_LLM_API_KEY`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let api_key = std::env::var(CREDENTIAL_ENV_VAR)
            .map_err(|_| GatewayError::Transport(format!("{CREDENTIAL_ENV_VAR} is not set")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[async_trait]
impl LlmGateway for HttpLlmGateway {
    async fn complete(&self, prompt: LlmPrompt) -> Result<LlmOutput, GatewayError> {
        let mut messages = Vec::new();
        if let Some(system) = &prompt.system {
            messages.push(ChatMessage { role: "system", content: system });
        }
        messages.push(ChatMessage { role: "user", content: &prompt.user });

        let body = ChatRequest { model: &self.model, messages };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(GatewayError::Transport(format!(
                "LLM endpoint returned status {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GatewayError::InvalidResponse("no choices in response".to_string()))?;

        let structured: Option<Value> = if prompt.schema.is_some() {
            match serde_json::from_str(&text) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("LLM response did not match requested schema: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(LlmOutput { text, structured })
    }
}
