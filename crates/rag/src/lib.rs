//! Knowledge retrieval: embed, index, and search domain nuggets that the
//! strategy generator folds into its prompts.

pub mod embedder;
pub mod qdrant_store;
pub mod retriever;

pub use embedder::{Embedder, HashProjectionEmbedder, EMBEDDING_DIM};
pub use qdrant_store::QdrantKnowledgeRetriever;
pub use retriever::InMemoryKnowledgeRetriever;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("vector store error: {0}")]
    VectorStore(String),

    #[error("search error: {0}")]
    Search(String),

    #[error("connection error: {0}")]
    Connection(String),
}

impl From<RagError> for tesla_copilot_core::Error {
    fn from(err: RagError) -> Self {
        tesla_copilot_core::Error::VectorStore(err.to_string())
    }
}
