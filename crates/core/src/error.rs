//! The crate-spanning error type every downstream crate's own error converts into.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("client not found: {0}")]
    ClientNotFound(String),

    #[error("interaction not found: {0}")]
    InteractionNotFound(String),

    #[error("knowledge nugget not found: {0}")]
    KnowledgeNotFound(String),

    #[error("dojo session not found: {0}")]
    DojoSessionNotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("llm unavailable: {0}")]
    LlmUnavailable(String),

    #[error("llm timed out after {0:?}")]
    LlmTimeout(std::time::Duration),

    #[error("vector store failure: {0}")]
    VectorStore(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
