//! Deterministic mock `LlmGateway`, used in tests and the CLI's `--offline`
//! demo mode: echoes the user prompt back without calling out to a model.

use advisor_application::ports::{GatewayError, LlmGateway, LlmOutput, LlmPrompt};
use async_trait::async_trait;

pub struct MockLlmGateway;

#[async_trait]
impl LlmGateway for MockLlmGateway {
    async fn complete(&self, prompt: LlmPrompt) -> Result<LlmOutput, GatewayError> {
        Ok(LlmOutput {
            text: format!("[offline synthesis]\n{}", prompt.user),
            structured: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_prompt_user_content() {
        let gateway = MockLlmGateway;
        let output = gateway.complete(LlmPrompt::new("what is a treachery card?")).await.unwrap();
        assert!(output.text.contains("what is a treachery card?"));
    }
}
