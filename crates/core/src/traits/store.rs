//! Session State Store (C3): contract only. The orchestrator depends on this
//! trait, never on a concrete persistence technology.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Client, CumulativePsychology, CustomerArchetype, HolisticProfile, Interaction,
    SalesIndicators, Result, Session, SessionContext, SessionStatus, StrategyResponse,
};

/// The fields `PersistAnalysis` writes atomically in a single update.
#[derive(Debug, Clone)]
pub struct AnalysisUpdate {
    pub cumulative_psychology: CumulativePsychology,
    pub psychology_confidence: u8,
    pub active_clarifying_questions: Vec<crate::ClarifyingQuestion>,
    pub customer_archetype: Option<CustomerArchetype>,
    pub sales_indicators: Option<SalesIndicators>,
    pub holistic_psychometric_profile: Option<HolisticProfile>,
    pub psychology_updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub user_input: String,
    pub ai_response: StrategyResponse,
    pub parent_interaction_id: Option<Uuid>,
}

/// Pluggable session/client/interaction persistence. The reference
/// implementor is an in-memory store; a production deployment substitutes a
/// relational-backed implementor behind the same trait.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session_context(&self, session_id: Uuid) -> Result<SessionContext>;

    async fn persist_analysis(&self, session_id: Uuid, update: AnalysisUpdate) -> Result<()>;

    /// Removes the answered question from `active_clarifying_questions` and
    /// appends to `cumulative_psychology.observations`, atomically.
    async fn record_clarification_answer(
        &self,
        session_id: Uuid,
        question_id: &str,
        answer: &str,
    ) -> Result<SessionContext>;

    async fn append_interaction(
        &self,
        session_id: Uuid,
        interaction: NewInteraction,
    ) -> Result<Interaction>;

    async fn record_feedback(
        &self,
        interaction_id: Uuid,
        suggestion_id: &str,
        score: i8,
    ) -> Result<()>;

    async fn create_client(
        &self,
        alias: Option<String>,
        archetype: Option<String>,
        notes: Option<String>,
        tags: Vec<String>,
    ) -> Result<Client>;

    async fn get_client(&self, client_id: Uuid) -> Result<Client>;

    async fn list_clients(&self, skip: usize, limit: usize) -> Result<Vec<Client>>;

    async fn create_session(&self, client_id: Uuid, status: SessionStatus) -> Result<Session>;

    async fn end_session(&self, session_id: Uuid) -> Result<Session>;

    async fn delete_session(&self, session_id: Uuid) -> Result<()>;

    async fn list_sessions(&self, client_id: Uuid, page: usize, page_size: usize) -> Result<Vec<Session>>;

    async fn list_interactions(
        &self,
        session_id: Uuid,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Interaction>>;
}
