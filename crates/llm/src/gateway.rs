//! Wraps an [`LlmBackend`] with the response-content cache described for
//! the analysis pipeline's single call primitive.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tesla_copilot_core::{LlmBackend, LlmCompletion, Result, TtlLruCache};

const DEFAULT_TTL_SECS: u64 = 3600;
const DEFAULT_MAX_SIZE: usize = 128;

pub struct LlmGateway {
    backend: Arc<dyn LlmBackend>,
    cache: TtlLruCache<String, String>,
}

impl LlmGateway {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self::with_cache_settings(
            backend,
            Duration::from_secs(DEFAULT_TTL_SECS),
            DEFAULT_MAX_SIZE,
        )
    }

    pub fn with_cache_settings(backend: Arc<dyn LlmBackend>, ttl: Duration, max_size: usize) -> Self {
        Self {
            backend,
            cache: TtlLruCache::new(ttl, max_size),
        }
    }

    /// Calls the backend, consulting the content cache first when
    /// `use_cache` is set. A cache hit still returns a fresh timestamp: the
    /// cached value is the model's content, not a frozen completion.
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        cache_key_prefix: &str,
        use_cache: bool,
    ) -> Result<LlmCompletion> {
        let key = cache_key(cache_key_prefix, system_prompt, user_prompt, self.backend.model_name());

        if use_cache {
            if let Some(content) = self.cache.get(&key) {
                return Ok(LlmCompletion {
                    content,
                    model: self.backend.model_name().to_string(),
                    ts: chrono::Utc::now(),
                });
            }
        }

        let completion = self.backend.complete(system_prompt, user_prompt).await?;

        if use_cache {
            self.cache.put(key, completion.content.clone());
        }

        Ok(completion)
    }

    pub async fn is_available(&self) -> bool {
        self.backend.is_available().await
    }
}

/// `SHA-256(prefix ∥ canonical_json({system, user, model}))`, truncated to
/// 16 hex characters.
fn cache_key(prefix: &str, system_prompt: &str, user_prompt: &str, model: &str) -> String {
    let canonical = serde_json::json!({
        "system": system_prompt,
        "user": user_prompt,
        "model": model,
    });
    let canonical_str = canonical.to_string();

    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(canonical_str.as_bytes());
    let digest = hasher.finalize();
    let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<String>();
    format!("{prefix}_{}", &hex[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubLlm {
        response: String,
        fail_next: AtomicUsize,
    }

    #[async_trait]
    impl LlmBackend for StubLlm {
        async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<LlmCompletion> {
            if self.fail_next.load(Ordering::SeqCst) > 0 {
                return Err(tesla_copilot_core::Error::LlmUnavailable(
                    "stub configured to fail".to_string(),
                ));
            }
            Ok(LlmCompletion {
                content: self.response.clone(),
                model: "stub-model".to_string(),
                ts: chrono::Utc::now(),
            })
        }

        async fn is_available(&self) -> bool {
            self.fail_next.load(Ordering::SeqCst) == 0
        }

        fn model_name(&self) -> &str {
            "stub-model"
        }
    }

    #[tokio::test]
    async fn second_call_with_same_key_is_served_from_cache() {
        let backend = Arc::new(StubLlm {
            response: "cached answer".to_string(),
            fail_next: AtomicUsize::new(0),
        });
        let gateway = LlmGateway::new(backend.clone());

        let first = gateway.generate("sys", "usr", "psychology", true).await.unwrap();
        assert_eq!(first.content, "cached answer");

        // A backend configured to fail from here on would make the second
        // call fail too, unless the cache actually serves the answer.
        backend.fail_next.store(usize::MAX, Ordering::SeqCst);
        let second = gateway.generate("sys", "usr", "psychology", true).await.unwrap();
        assert_eq!(second.content, "cached answer");
    }

    #[tokio::test]
    async fn use_cache_false_always_calls_the_backend() {
        let backend = Arc::new(StubLlm {
            response: String::new(),
            fail_next: AtomicUsize::new(usize::MAX),
        });
        let gateway = LlmGateway::new(backend);
        assert!(gateway.generate("sys", "usr", "psychology", false).await.is_err());
    }

    #[test]
    fn cache_key_is_stable_for_identical_inputs() {
        let a = cache_key("psychology", "sys", "usr", "model-x");
        let b = cache_key("psychology", "sys", "usr", "model-x");
        assert_eq!(a, b);
        assert!(a.starts_with("psychology_"));
    }

    #[test]
    fn cache_key_differs_by_prefix() {
        let a = cache_key("psychology", "sys", "usr", "model-x");
        let b = cache_key("strategy", "sys", "usr", "model-x");
        assert_ne!(a, b);
    }
}
