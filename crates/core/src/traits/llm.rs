//! The single call primitive every analysis stage is built on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;

/// One completed call to the underlying language model.
#[derive(Debug, Clone)]
pub struct LlmCompletion {
    pub content: String,
    pub model: String,
    pub ts: DateTime<Utc>,
}

/// A pluggable chat-completion backend. Implementations own transport,
/// retries and timeouts; callers never see a raw transport error — only
/// [`crate::Error::LlmUnavailable`] or [`crate::Error::LlmTimeout`] after the
/// backend's own retry budget is exhausted.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<LlmCompletion>;

    async fn is_available(&self) -> bool;

    fn model_name(&self) -> &str;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A deterministic double for pipeline-level tests: always succeeds
    /// unless configured to fail the next N calls.
    pub struct MockLlm {
        pub model: String,
        pub response: String,
        pub fail_next: AtomicUsize,
    }

    impl MockLlm {
        pub fn always_succeeds(response: impl Into<String>) -> Self {
            Self {
                model: "mock-llm".to_string(),
                response: response.into(),
                fail_next: AtomicUsize::new(0),
            }
        }

        pub fn always_fails() -> Self {
            Self {
                model: "mock-llm".to_string(),
                response: String::new(),
                fail_next: AtomicUsize::new(usize::MAX),
            }
        }
    }

    #[async_trait]
    impl LlmBackend for MockLlm {
        async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<LlmCompletion> {
            let remaining = self.fail_next.load(Ordering::SeqCst);
            if remaining > 0 {
                if remaining != usize::MAX {
                    self.fail_next.fetch_sub(1, Ordering::SeqCst);
                }
                return Err(crate::Error::LlmUnavailable("mock configured to fail".into()));
            }
            Ok(LlmCompletion {
                content: self.response.clone(),
                model: self.model.clone(),
                ts: Utc::now(),
            })
        }

        async fn is_available(&self) -> bool {
            self.fail_next.load(Ordering::SeqCst) == 0
        }

        fn model_name(&self) -> &str {
            &self.model
        }
    }

    #[tokio::test]
    async fn mock_llm_returns_configured_response() {
        let llm = MockLlm::always_succeeds("hello");
        let out = llm.complete("sys", "usr").await.unwrap();
        assert_eq!(out.content, "hello");
    }

    #[tokio::test]
    async fn mock_llm_can_be_made_to_fail() {
        let llm = MockLlm::always_fails();
        assert!(llm.complete("sys", "usr").await.is_err());
    }
}
