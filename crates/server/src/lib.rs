//! HTTP surface over the analysis pipeline: clients, sessions, interactions,
//! knowledge, and the dojo training channel.

pub mod http;
pub mod metrics;
pub mod sse;
pub mod state;

pub use http::create_router;
pub use state::AppState;

use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-handling errors scoped to the HTTP boundary. Stage-local failures
/// never reach here — they are absorbed into fallback responses upstream;
/// this enum only covers validation, missing entities, and unrecoverable
/// storage/transport failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Semantic(String),

    #[error("{0}")]
    Internal(String),
}

impl From<tesla_copilot_core::Error> for ServerError {
    fn from(err: tesla_copilot_core::Error) -> Self {
        use tesla_copilot_core::Error::*;
        match err {
            SessionNotFound(_) | ClientNotFound(_) | InteractionNotFound(_)
            | KnowledgeNotFound(_) | DojoSessionNotFound(_) => ServerError::NotFound(err.to_string()),
            Validation(_) => ServerError::Validation(err.to_string()),
            Storage(_) | LlmUnavailable(_) | LlmTimeout(_) | VectorStore(_) | Internal(_) => {
                ServerError::Internal(err.to_string())
            }
        }
    }
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            ServerError::Validation(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Semantic(_) => axum::http::StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ServerError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            ServerError::Validation(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Semantic(_) => axum::http::StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
