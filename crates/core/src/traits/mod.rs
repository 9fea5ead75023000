//! Seam traits every pluggable collaborator in the pipeline implements.

pub mod archetype_service;
pub mod llm;
pub mod retriever;
pub mod store;

pub use archetype_service::ArchetypeService;
pub use llm::{LlmBackend, LlmCompletion};
pub use retriever::{HealthStatus, Retriever, SearchFilter};
pub use store::{AnalysisUpdate, NewInteraction, SessionStore};
