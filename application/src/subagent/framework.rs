//! Uniform subagent contract and the retry/cache decorators that wrap any
//! concrete subagent (spec §4.4).

use advisor_domain::{AgentDiagnostics, AgentKind, SubagentRequest, SubagentResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::ports::response_cache::ResponseCache;

/// A single specialist: takes a request, returns a response on its own
/// `AgentPayload` variant. Implementations must be side-effect free aside
/// from the ports they are given (retrieval, card store, LLM gateway).
#[async_trait]
pub trait Subagent: Send + Sync {
    fn kind(&self) -> AgentKind;

    async fn run(&self, request: &SubagentRequest) -> SubagentResponse;
}

/// Clamps a raw confidence estimate into `[0.0, 1.0]`, treating NaN as 0.
/// Shared by every subagent so confidence scores are comparable across
/// agents (spec §4.4 Invariants).
pub fn compute_bounded(raw: f32) -> f32 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 1.0)
    }
}

/// Wraps a subagent with up to `max_attempts` retries on transient
/// failure (a response whose `diagnostics.error` is set). The first
/// successful attempt wins; if every attempt errors, the last error
/// response is returned.
pub struct RetryingSubagent<A: Subagent> {
    inner: A,
    max_attempts: u32,
}

impl<A: Subagent> RetryingSubagent<A> {
    pub fn new(inner: A, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
        }
    }
}

#[async_trait]
impl<A: Subagent> Subagent for RetryingSubagent<A> {
    fn kind(&self) -> AgentKind {
        self.inner.kind()
    }

    async fn run(&self, request: &SubagentRequest) -> SubagentResponse {
        let mut last = None;
        for attempt in 1..=self.max_attempts {
            let response = self.inner.run(request).await;
            if !response.diagnostics.error {
                return response;
            }
            warn!(
                agent = %self.inner.kind(),
                attempt,
                error_kind = ?response.diagnostics.error_kind,
                "subagent attempt failed"
            );
            last = Some(response);
        }
        last.expect("max_attempts is at least 1")
    }
}

/// Wraps a subagent with response caching keyed on
/// `SubagentRequest::canonical_key()`. A cache hit short-circuits the
/// inner agent entirely (spec §4.5).
pub struct CachedSubagent<A: Subagent> {
    inner: A,
    cache: Arc<dyn ResponseCache>,
}

impl<A: Subagent> CachedSubagent<A> {
    pub fn new(inner: A, cache: Arc<dyn ResponseCache>) -> Self {
        Self { inner, cache }
    }

    fn cache_key(&self, request: &SubagentRequest) -> String {
        format!("{}:{}", self.inner.kind(), request.canonical_key())
    }
}

#[async_trait]
impl<A: Subagent> Subagent for CachedSubagent<A> {
    fn kind(&self) -> AgentKind {
        self.inner.kind()
    }

    async fn run(&self, request: &SubagentRequest) -> SubagentResponse {
        let key = self.cache_key(request);
        if let Some(cached) = self.cache.get(&key).await {
            if let Ok(mut response) = serde_json::from_str::<SubagentResponse>(&cached) {
                response
                    .diagnostics
                    .extra
                    .insert("cache".to_string(), "hit".to_string());
                return response;
            }
        }

        let started = Instant::now();
        let response = self.inner.run(request).await;
        if !response.diagnostics.error {
            if let Ok(serialized) = serde_json::to_string(&response) {
                self.cache.put(key, serialized).await;
            }
        }
        let _ = started.elapsed();
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_bounded_clamps_range() {
        assert_eq!(compute_bounded(-1.0), 0.0);
        assert_eq!(compute_bounded(2.0), 1.0);
        assert_eq!(compute_bounded(0.5), 0.5);
        assert_eq!(compute_bounded(f32::NAN), 0.0);
    }

    struct FlakyAgent {
        calls: std::sync::atomic::AtomicU32,
        fail_times: u32,
    }

    #[async_trait]
    impl Subagent for FlakyAgent {
        fn kind(&self) -> AgentKind {
            AgentKind::Rules
        }

        async fn run(&self, _request: &SubagentRequest) -> SubagentResponse {
            let n = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if n < self.fail_times {
                SubagentResponse::empty_error(AgentKind::Rules, "", "transient")
            } else {
                let mut response = SubagentResponse::empty_error(AgentKind::Rules, "", "transient");
                response.diagnostics.error = false;
                response.diagnostics.error_kind = None;
                response
            }
        }
    }

    #[tokio::test]
    async fn retrying_subagent_recovers_after_transient_failures() {
        let agent = RetryingSubagent::new(
            FlakyAgent {
                calls: std::sync::atomic::AtomicU32::new(0),
                fail_times: 2,
            },
            3,
        );
        let request = SubagentRequest::new("test");
        let response = agent.run(&request).await;
        assert!(!response.diagnostics.error);
    }

    #[tokio::test]
    async fn retrying_subagent_surfaces_last_error_after_exhaustion() {
        let agent = RetryingSubagent::new(
            FlakyAgent {
                calls: std::sync::atomic::AtomicU32::new(0),
                fail_times: 10,
            },
            2,
        );
        let request = SubagentRequest::new("test");
        let response = agent.run(&request).await;
        assert!(response.diagnostics.error);
    }
}
