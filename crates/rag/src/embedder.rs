//! Pluggable embedding. The reference implementor is deterministic and
//! dependency-free, suitable for tests and for environments without a
//! model-serving sidecar; a real sentence-transformer model is substituted
//! at this trait boundary.

pub const EMBEDDING_DIM: usize = 384;

pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;

    fn dim(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Hashes overlapping character trigrams into a fixed-width vector, then
/// unit-normalizes it. Stable across runs and processes: same text always
/// produces the same vector, and lexically similar texts land closer
/// together than unrelated ones because they share trigrams.
pub struct HashProjectionEmbedder {
    dim: usize,
}

impl Default for HashProjectionEmbedder {
    fn default() -> Self {
        Self { dim: EMBEDDING_DIM }
    }
}

impl HashProjectionEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn trigrams(text: &str) -> Vec<String> {
        let normalized: Vec<char> = text.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
        if normalized.len() < 3 {
            return vec![normalized.into_iter().collect()];
        }
        normalized
            .windows(3)
            .map(|w| w.iter().collect::<String>())
            .collect()
    }
}

impl Embedder for HashProjectionEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];

        for gram in Self::trigrams(text) {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            std::hash::Hash::hash(&gram, &mut hasher);
            let h = std::hash::Hasher::finish(&hasher);
            let bucket = (h as usize) % self.dim;
            let sign = if (h >> 63) & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vector.iter_mut() {
                *v /= norm;
            }
        }
        vector
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_embeds_identically() {
        let embedder = HashProjectionEmbedder::default();
        assert_eq!(embedder.embed("full self driving"), embedder.embed("full self driving"));
    }

    #[test]
    fn vectors_are_unit_normalized() {
        let embedder = HashProjectionEmbedder::default();
        let v = embedder.embed("regenerative braking");
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4 || norm == 0.0);
    }

    #[test]
    fn similar_text_scores_higher_than_unrelated_text() {
        let embedder = HashProjectionEmbedder::default();
        let query = embedder.embed("autopilot safety features");
        let similar = embedder.embed("autopilot safety improvements");
        let unrelated = embedder.embed("quarterly earnings call");
        assert!(cosine_similarity(&query, &similar) > cosine_similarity(&query, &unrelated));
    }
}
