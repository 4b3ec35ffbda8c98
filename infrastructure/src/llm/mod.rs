//! LLM gateway adapters: an HTTP-backed provider and a deterministic mock.

mod http_gateway;
mod mock_gateway;

pub use http_gateway::HttpLlmGateway;
pub use mock_gateway::MockLlmGateway;
