//! Knowledge retrieval: embedding + nearest-neighbour search over
//! [`crate::KnowledgeNugget`]s, plus the bulk-write path the dojo uses.

use async_trait::async_trait;

use crate::{KnowledgeNugget, Result, ScoredNugget};

#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub archetype: Option<String>,
    pub kind: Option<crate::KnowledgeType>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub collection_exists: bool,
    pub nugget_count: usize,
}

#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(
        &self,
        query_text: &str,
        filter: &SearchFilter,
        limit: usize,
    ) -> Result<Vec<ScoredNugget>>;

    async fn bulk_upsert(&self, nuggets: Vec<KnowledgeNugget>) -> Result<Vec<String>>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn get_all(&self, limit: usize) -> Result<Vec<KnowledgeNugget>>;

    async fn health(&self) -> Result<HealthStatus>;
}
