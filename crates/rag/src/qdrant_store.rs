//! Production [`Retriever`](tesla_copilot_core::Retriever) backed by Qdrant.
//! Refuses writes when the embedder's dimension doesn't match the
//! collection's configured dimension, since that mismatch would silently
//! corrupt the cosine index.

use std::sync::Arc;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, ScrollPointsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use tesla_copilot_core::{HealthStatus, KnowledgeNugget, Result, ScoredNugget, SearchFilter};

use crate::embedder::Embedder;
use crate::RagError;

pub struct QdrantKnowledgeRetriever {
    client: Qdrant,
    collection: String,
    embedder: Arc<dyn Embedder>,
}

impl QdrantKnowledgeRetriever {
    pub async fn connect(url: &str, collection: &str, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| RagError::Connection(e.to_string()))?;

        let retriever = Self {
            client,
            collection: collection.to_string(),
            embedder,
        };
        retriever.ensure_collection().await?;
        Ok(retriever)
    }

    async fn ensure_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.embedder.dim() as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| RagError::VectorStore(e.to_string()))?;
        }
        Ok(())
    }

    fn to_point(nugget: &KnowledgeNugget) -> Result<PointStruct> {
        if nugget.embedding_vector.is_empty() {
            return Err(RagError::Embedding(format!(
                "nugget {} has no embedding",
                nugget.id
            ))
            .into());
        }
        let payload_json = serde_json::to_value(nugget)
            .map_err(|e| RagError::VectorStore(e.to_string()))?;
        let payload = qdrant_client::Payload::try_from(payload_json)
            .map_err(|e| RagError::VectorStore(e.to_string()))?;
        Ok(PointStruct::new(
            nugget.id.clone(),
            nugget.embedding_vector.clone(),
            payload,
        ))
    }

    fn point_id_to_string(id: Option<qdrant_client::qdrant::PointId>) -> String {
        use qdrant_client::qdrant::point_id::PointIdOptions;
        match id.and_then(|id| id.point_id_options) {
            Some(PointIdOptions::Uuid(s)) => s,
            Some(PointIdOptions::Num(n)) => n.to_string(),
            None => String::new(),
        }
    }

    fn from_payload(id: String, payload: &std::collections::HashMap<String, qdrant_client::qdrant::Value>) -> Option<KnowledgeNugget> {
        let json = qdrant_client::Payload::from(payload.clone()).into();
        let mut nugget: KnowledgeNugget = serde_json::from_value(json).ok()?;
        nugget.id = id;
        Some(nugget)
    }
}

#[async_trait]
impl tesla_copilot_core::Retriever for QdrantKnowledgeRetriever {
    async fn search(
        &self,
        query_text: &str,
        filter: &SearchFilter,
        limit: usize,
    ) -> Result<Vec<ScoredNugget>> {
        let query_embedding = self.embedder.embed(query_text);

        let mut conditions = Vec::new();
        if let Some(archetype) = &filter.archetype {
            conditions.push(Condition::matches("archetype", archetype.clone()));
        }
        if let Some(kind) = &filter.kind {
            conditions.push(Condition::matches(
                "type",
                serde_json::to_value(kind).unwrap_or_default().as_str().unwrap_or_default().to_string(),
            ));
        }

        let mut builder = SearchPointsBuilder::new(&self.collection, query_embedding, limit as u64)
            .with_payload(true);
        if !conditions.is_empty() {
            builder = builder.filter(Filter::must(conditions));
        }

        let response = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Search(e.to_string()))?;

        Ok(response
            .result
            .into_iter()
            .filter_map(|point| {
                let id = Self::point_id_to_string(point.id.clone());
                let nugget = Self::from_payload(id, &point.payload)?;
                Some(ScoredNugget {
                    nugget,
                    similarity_score: point.score,
                })
            })
            .collect())
    }

    async fn bulk_upsert(&self, mut incoming: Vec<KnowledgeNugget>) -> Result<Vec<String>> {
        for nugget in incoming.iter_mut() {
            if nugget.id.is_empty() {
                nugget.id = uuid::Uuid::new_v4().to_string();
            }
            if nugget.embedding_vector.is_empty() {
                nugget.embedding_vector = self.embedder.embed(&nugget.content);
            }
        }

        let ids: Vec<String> = incoming.iter().map(|n| n.id.clone()).collect();
        let points: Result<Vec<PointStruct>> = incoming.iter().map(Self::to_point).collect();
        let points = points?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        Ok(ids)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        use qdrant_client::qdrant::DeletePointsBuilder;

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(vec![qdrant_client::qdrant::PointId::from(id)]),
            )
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;
        Ok(())
    }

    async fn get_all(&self, limit: usize) -> Result<Vec<KnowledgeNugget>> {
        let response = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection)
                    .limit(limit as u32)
                    .with_payload(true),
            )
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        Ok(response
            .result
            .into_iter()
            .filter_map(|point| {
                let id = Self::point_id_to_string(point.id.clone());
                Self::from_payload(id, &point.payload)
            })
            .collect())
    }

    async fn health(&self) -> Result<HealthStatus> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        let count = if exists {
            self.client
                .collection_info(&self.collection)
                .await
                .ok()
                .and_then(|info| info.result)
                .and_then(|r| r.points_count)
                .unwrap_or(0)
        } else {
            0
        };

        Ok(HealthStatus {
            status: if exists { "ok" } else { "missing_collection" }.to_string(),
            collection_exists: exists,
            nugget_count: count as usize,
        })
    }
}
