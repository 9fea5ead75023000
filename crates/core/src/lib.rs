//! Core domain types and seam traits for the Tesla sales analysis pipeline.
//!
//! This crate has no I/O and no LLM dependency: it defines the vocabulary
//! (`Session`, `CumulativePsychology`, `StrategyResponse`, ...) and the
//! traits (`LlmBackend`, `Retriever`, `SessionStore`, `ArchetypeService`)
//! that every other crate in the workspace builds against.

pub mod cache;
pub mod domain;
pub mod error;
pub mod json_extract;
pub mod traits;

pub use cache::TtlLruCache;
pub use error::{Error, Result};
pub use json_extract::{extract_outermost_json, parse_outermost_json};

pub use domain::{
    ArchetypeKey, BigFive, BigFiveTrait, ChurnRisk, Client, ClarifyingQuestion,
    CommunicationStyle, ContextType, CumulativePsychology, CustomerArchetype,
    CustomerJourneyStage, Disc, DiscTrait, DojoResponseType, DojoTurn, Feedback, HolisticProfile,
    Interaction, JourneyStage, KnowledgeNugget, KnowledgeType, LikelyArchetype, Observation,
    ObjectionHandling, PurchaseTemperature, QuickResponse, RiskLevel, SalesIndicators,
    SalesPlaybook, SalesPotential, SchwartzValue, ScoredNugget, Session, SessionContext,
    SessionStatus, StrategyResponse, SuggestedAction, SuggestedQuestion, TemperatureLevel,
    TraitScore, UrgencyLevel,
};

pub use traits::{
    AnalysisUpdate, ArchetypeService, HealthStatus, LlmBackend, LlmCompletion, NewInteraction,
    Retriever, SearchFilter, SessionStore,
};
