//! An in-memory [`Retriever`] over embedded knowledge nuggets: the default
//! when no external vector store is configured, and the backing of every
//! dojo/retriever test.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tesla_copilot_core::{
    HealthStatus, KnowledgeNugget, Result, ScoredNugget, SearchFilter,
};

use crate::embedder::{cosine_similarity, Embedder};

pub struct InMemoryKnowledgeRetriever {
    embedder: Arc<dyn Embedder>,
    nuggets: RwLock<Vec<KnowledgeNugget>>,
}

impl InMemoryKnowledgeRetriever {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            nuggets: RwLock::new(Vec::new()),
        }
    }

    fn matches_filter(nugget: &KnowledgeNugget, filter: &SearchFilter) -> bool {
        if let Some(archetype) = &filter.archetype {
            if nugget.archetype.as_deref() != Some(archetype.as_str()) {
                return false;
            }
        }
        if let Some(kind) = &filter.kind {
            if nugget.kind != *kind {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl tesla_copilot_core::Retriever for InMemoryKnowledgeRetriever {
    async fn search(
        &self,
        query_text: &str,
        filter: &SearchFilter,
        limit: usize,
    ) -> Result<Vec<ScoredNugget>> {
        let query_embedding = self.embedder.embed(query_text);

        let mut scored: Vec<ScoredNugget> = self
            .nuggets
            .read()
            .iter()
            .filter(|n| Self::matches_filter(n, filter))
            .map(|n| ScoredNugget {
                nugget: n.clone(),
                similarity_score: cosine_similarity(&query_embedding, &n.embedding_vector),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        Ok(scored)
    }

    async fn bulk_upsert(&self, mut incoming: Vec<KnowledgeNugget>) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(incoming.len());
        let mut store = self.nuggets.write();

        for nugget in incoming.iter_mut() {
            if nugget.id.is_empty() {
                nugget.id = uuid::Uuid::new_v4().to_string();
            }
            if nugget.embedding_vector.is_empty() {
                nugget.embedding_vector = self.embedder.embed(&nugget.content);
            }
            ids.push(nugget.id.clone());
        }

        store.retain(|existing| !incoming.iter().any(|n| n.id == existing.id));
        store.extend(incoming);
        Ok(ids)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut store = self.nuggets.write();
        let before = store.len();
        store.retain(|n| n.id != id);
        if store.len() == before {
            return Err(tesla_copilot_core::Error::KnowledgeNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn get_all(&self, limit: usize) -> Result<Vec<KnowledgeNugget>> {
        Ok(self.nuggets.read().iter().take(limit).cloned().collect())
    }

    async fn health(&self) -> Result<HealthStatus> {
        let store = self.nuggets.read();
        Ok(HealthStatus {
            status: "ok".to_string(),
            collection_exists: true,
            nugget_count: store.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashProjectionEmbedder;
    use tesla_copilot_core::{KnowledgeType, Retriever};

    fn nugget(id: &str, content: &str, archetype: Option<&str>) -> KnowledgeNugget {
        KnowledgeNugget {
            id: id.to_string(),
            content: content.to_string(),
            title: content.to_string(),
            kind: KnowledgeType::Product,
            archetype: archetype.map(str::to_string),
            tags: Vec::new(),
            source: "test".to_string(),
            created_at: chrono::Utc::now(),
            embedding_vector: Vec::new(),
        }
    }

    #[tokio::test]
    async fn bulk_upsert_assigns_ids_and_embeddings() {
        let retriever = InMemoryKnowledgeRetriever::new(Arc::new(HashProjectionEmbedder::default()));
        let ids = retriever
            .bulk_upsert(vec![nugget("", "full self driving capability", None)])
            .await
            .unwrap();
        assert_eq!(ids.len(), 1);
        assert!(!ids[0].is_empty());
    }

    #[tokio::test]
    async fn search_respects_archetype_filter() {
        let retriever = InMemoryKnowledgeRetriever::new(Arc::new(HashProjectionEmbedder::default()));
        retriever
            .bulk_upsert(vec![
                nugget("a", "tech enthusiasts love the yoke steering wheel", Some("tech_enthusiast")),
                nugget("b", "family buyers care about safety ratings", Some("safety_conscious_parent")),
            ])
            .await
            .unwrap();

        let filter = SearchFilter {
            archetype: Some("safety_conscious_parent".to_string()),
            kind: None,
        };
        let results = retriever.search("safety", &filter, 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].nugget.id, "b");
    }

    #[tokio::test]
    async fn delete_on_unknown_id_fails() {
        let retriever = InMemoryKnowledgeRetriever::new(Arc::new(HashProjectionEmbedder::default()));
        assert!(retriever.delete("missing").await.is_err());
    }
}
