//! Shared `SHA-256(prefix ∥ canonical_json(value))` keying, used by both the
//! holistic synthesizer's DNA cache and the sales indicator generator's
//! cache — each keyed on its own input, not on the LLM prompt.

use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn cache_key<T: Serialize>(prefix: &str, value: &T) -> String {
    let canonical = serde_json::to_string(value).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect::<String>()
}
