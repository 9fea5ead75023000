//! C3: the in-memory reference implementor of [`SessionStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use tesla_copilot_core::{
    AnalysisUpdate, Client, Error, Interaction, NewInteraction, Observation, Result, Session,
    SessionContext, SessionStatus, SessionStore,
};

#[derive(Default)]
struct Store {
    clients: HashMap<Uuid, Client>,
    sessions: HashMap<Uuid, Session>,
    interactions: HashMap<Uuid, Vec<Interaction>>,
}

/// Reference implementation used by tests and by default when no external
/// store is configured. A production deployment substitutes a
/// relational-backed implementor behind the same trait.
pub struct InMemorySessionStore {
    inner: RwLock<Store>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Store::default()) }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_session_context(&self, session_id: Uuid) -> Result<SessionContext> {
        let store = self.inner.read();
        let session = store
            .sessions
            .get(&session_id)
            .cloned()
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let interactions = store.interactions.get(&session_id).cloned().unwrap_or_default();
        let client = session.client_id.and_then(|id| store.clients.get(&id).cloned());
        Ok(SessionContext { session, interactions, client })
    }

    async fn persist_analysis(&self, session_id: Uuid, update: AnalysisUpdate) -> Result<()> {
        let mut store = self.inner.write();
        let session = store
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        session.cumulative_psychology = update.cumulative_psychology;
        session.psychology_confidence = update.psychology_confidence;
        session.active_clarifying_questions = update.active_clarifying_questions;
        session.customer_archetype = update.customer_archetype;
        session.sales_indicators = update.sales_indicators;
        session.holistic_psychometric_profile = update.holistic_psychometric_profile;
        session.psychology_updated_at = Some(update.psychology_updated_at);
        Ok(())
    }

    async fn record_clarification_answer(
        &self,
        session_id: Uuid,
        question_id: &str,
        answer: &str,
    ) -> Result<SessionContext> {
        {
            let mut store = self.inner.write();
            let session = store
                .sessions
                .get_mut(&session_id)
                .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
            if let Some(idx) = session
                .active_clarifying_questions
                .iter()
                .position(|q| q.id == question_id)
            {
                let question = session.active_clarifying_questions.remove(idx);
                session.cumulative_psychology.observations.push(Observation {
                    question: question.question,
                    answer: answer.to_string(),
                    ts: Utc::now(),
                    target: question.psychological_target,
                });
            }
        }
        self.get_session_context(session_id).await
    }

    async fn append_interaction(
        &self,
        session_id: Uuid,
        interaction: NewInteraction,
    ) -> Result<Interaction> {
        let mut store = self.inner.write();
        if !store.sessions.contains_key(&session_id) {
            return Err(Error::SessionNotFound(session_id.to_string()));
        }
        let record = Interaction {
            id: Uuid::new_v4(),
            session_id,
            ts: Utc::now(),
            user_input: interaction.user_input,
            ai_response: interaction.ai_response,
            feedback: Vec::new(),
            parent_interaction_id: interaction.parent_interaction_id,
        };
        store.interactions.entry(session_id).or_default().push(record.clone());
        Ok(record)
    }

    async fn record_feedback(&self, interaction_id: Uuid, suggestion_id: &str, score: i8) -> Result<()> {
        let mut store = self.inner.write();
        for interactions in store.interactions.values_mut() {
            if let Some(interaction) = interactions.iter_mut().find(|i| i.id == interaction_id) {
                interaction.feedback.push(tesla_copilot_core::Feedback {
                    suggestion_id: suggestion_id.to_string(),
                    score,
                });
                return Ok(());
            }
        }
        Err(Error::InteractionNotFound(interaction_id.to_string()))
    }

    async fn create_client(
        &self,
        alias: Option<String>,
        archetype: Option<String>,
        notes: Option<String>,
        tags: Vec<String>,
    ) -> Result<Client> {
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            alias,
            archetype,
            notes,
            tags,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn get_client(&self, client_id: Uuid) -> Result<Client> {
        self.inner
            .read()
            .clients
            .get(&client_id)
            .cloned()
            .ok_or_else(|| Error::ClientNotFound(client_id.to_string()))
    }

    async fn list_clients(&self, skip: usize, limit: usize) -> Result<Vec<Client>> {
        let store = self.inner.read();
        let mut clients: Vec<Client> = store.clients.values().cloned().collect();
        clients.sort_by_key(|c| c.created_at);
        Ok(clients.into_iter().skip(skip).take(limit).collect())
    }

    async fn create_session(&self, client_id: Uuid, status: SessionStatus) -> Result<Session> {
        let mut store = self.inner.write();
        if !store.clients.contains_key(&client_id) {
            return Err(Error::ClientNotFound(client_id.to_string()));
        }
        let session = Session::new(Some(client_id), status);
        store.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn end_session(&self, session_id: Uuid) -> Result<Session> {
        let mut store = self.inner.write();
        let session = store
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        session.status = SessionStatus::Completed;
        session.end_ts = Some(Utc::now());
        Ok(session.clone())
    }

    async fn delete_session(&self, session_id: Uuid) -> Result<()> {
        let mut store = self.inner.write();
        if store.sessions.remove(&session_id).is_none() {
            return Err(Error::SessionNotFound(session_id.to_string()));
        }
        store.interactions.remove(&session_id);
        Ok(())
    }

    async fn list_sessions(&self, client_id: Uuid, page: usize, page_size: usize) -> Result<Vec<Session>> {
        let store = self.inner.read();
        let mut sessions: Vec<Session> = store
            .sessions
            .values()
            .filter(|s| s.client_id == Some(client_id))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.start_ts);
        Ok(sessions.into_iter().skip(page * page_size).take(page_size).collect())
    }

    async fn list_interactions(
        &self,
        session_id: Uuid,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Interaction>> {
        let store = self.inner.read();
        let mut interactions = store.interactions.get(&session_id).cloned().unwrap_or_default();
        interactions.sort_by_key(|i| i.ts);
        Ok(interactions.into_iter().skip(page * page_size).take(page_size).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_lifecycle_round_trips_through_the_store() {
        let store = InMemorySessionStore::new();
        let client = store.create_client(Some("alias".into()), None, None, vec![]).await.unwrap();
        let session = store.create_session(client.id, SessionStatus::Active).await.unwrap();

        let ctx = store.get_session_context(session.id).await.unwrap();
        assert_eq!(ctx.client.unwrap().id, client.id);
        assert!(ctx.interactions.is_empty());

        let ended = store.end_session(session.id).await.unwrap();
        assert_eq!(ended.status, SessionStatus::Completed);
        assert!(ended.end_ts.is_some());
    }

    #[tokio::test]
    async fn delete_session_removes_it_from_the_store() {
        let store = InMemorySessionStore::new();
        let client = store.create_client(None, None, None, vec![]).await.unwrap();
        let session = store.create_session(client.id, SessionStatus::Active).await.unwrap();

        store.delete_session(session.id).await.unwrap();
        assert!(matches!(
            store.get_session_context(session.id).await,
            Err(Error::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn get_session_context_on_unknown_session_fails() {
        let store = InMemorySessionStore::new();
        let result = store.get_session_context(Uuid::new_v4()).await;
        assert!(matches!(result, Err(Error::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn record_clarification_answer_removes_question_and_appends_observation() {
        let store = InMemorySessionStore::new();
        let client = store.create_client(None, None, None, vec![]).await.unwrap();
        let session = store.create_session(client.id, SessionStatus::Active).await.unwrap();

        let question = tesla_copilot_core::ClarifyingQuestion {
            id: "q1".to_string(),
            question: "Czy wolisz prostotę?".to_string(),
            option_a: "confirms".to_string(),
            option_b: "denies".to_string(),
            psychological_target: "openness".to_string(),
        };
        store
            .persist_analysis(
                session.id,
                AnalysisUpdate {
                    cumulative_psychology: Default::default(),
                    psychology_confidence: 40,
                    active_clarifying_questions: vec![question],
                    customer_archetype: None,
                    sales_indicators: None,
                    holistic_psychometric_profile: None,
                    psychology_updated_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let ctx = store.record_clarification_answer(session.id, "q1", "confirms").await.unwrap();
        assert!(ctx.session.active_clarifying_questions.is_empty());
        assert_eq!(ctx.session.cumulative_psychology.observations.len(), 1);
    }
}
