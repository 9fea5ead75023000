//! The single call primitive every analysis stage is built on: a retrying,
//! timing-out chat completion backed by an in-memory response cache.

pub mod backend;
pub mod gateway;

pub use backend::{LlmConfig, OllamaBackend};
pub use gateway::LlmGateway;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm transport error: {0}")]
    Transport(String),

    #[error("llm returned a non-success status: {0}")]
    Api(String),

    #[error("llm response could not be parsed: {0}")]
    InvalidResponse(String),

    #[error("llm request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("llm configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(std::time::Duration::default())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

impl From<LlmError> for tesla_copilot_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(d) => tesla_copilot_core::Error::LlmTimeout(d),
            other => tesla_copilot_core::Error::LlmUnavailable(other.to_string()),
        }
    }
}
