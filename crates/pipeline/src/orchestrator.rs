//! C9: sequences C4-C8 for a single session turn, with a per-session mutex
//! enforcing the ordering guarantee and a concurrent persist+indicators fork.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use tesla_copilot_archetype::TeslaArchetypeService;
use tesla_copilot_core::{
    AnalysisUpdate, ArchetypeService, ContextType, Interaction, NewInteraction, Result,
    SessionContext, SessionStore,
};
use tesla_copilot_psychology::PsychologyAnalyzer;
use tesla_copilot_strategy::{fallback_response, SalesStrategyGenerator};
use tesla_copilot_synthesis::{HolisticSynthesizer, SalesIndicatorGenerator};

/// Renders the ordered interaction history as `[i] HH:MM:SS - seller: <text>`
/// lines, the transcript shape the psychology analyzer expects.
fn format_transcript(interactions: &[Interaction]) -> String {
    interactions
        .iter()
        .enumerate()
        .map(|(i, interaction)| {
            format!(
                "[{i}] {} - seller: {}",
                interaction.ts.format("%H:%M:%S"),
                interaction.user_input
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn history_lines(interactions: &[Interaction]) -> Vec<String> {
    interactions.iter().map(|i| format!("seller: {}", i.user_input)).collect()
}

pub struct PipelineOrchestrator {
    store: Arc<dyn SessionStore>,
    analyzer: Arc<PsychologyAnalyzer>,
    archetype_service: Arc<TeslaArchetypeService>,
    synthesizer: Arc<HolisticSynthesizer>,
    indicator_generator: Arc<SalesIndicatorGenerator>,
    strategy_generator: Arc<SalesStrategyGenerator>,
    session_locks: SyncMutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl PipelineOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        analyzer: Arc<PsychologyAnalyzer>,
        archetype_service: Arc<TeslaArchetypeService>,
        synthesizer: Arc<HolisticSynthesizer>,
        indicator_generator: Arc<SalesIndicatorGenerator>,
        strategy_generator: Arc<SalesStrategyGenerator>,
    ) -> Self {
        Self {
            store,
            analyzer,
            archetype_service,
            synthesizer,
            indicator_generator,
            strategy_generator,
            session_locks: SyncMutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, session_id: Uuid) -> Arc<AsyncMutex<()>> {
        self.session_locks.lock().entry(session_id).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
    }

    pub async fn process_observation(
        &self,
        session_id: Uuid,
        user_input: &str,
        parent_interaction_id: Option<Uuid>,
    ) -> Result<Interaction> {
        let lock = self.lock_for(session_id);
        let _guard = lock.lock().await;

        let ctx = self.store.get_session_context(session_id).await?;
        self.run_turn(session_id, ctx, user_input, parent_interaction_id).await
    }

    pub async fn answer_clarifying_question(
        &self,
        session_id: Uuid,
        question_id: &str,
        answer: &str,
    ) -> Result<Interaction> {
        let lock = self.lock_for(session_id);
        let _guard = lock.lock().await;

        let ctx = self.store.record_clarification_answer(session_id, question_id, answer).await?;
        let user_input = format!("[clarifying answer] {answer}");
        self.run_turn(session_id, ctx, &user_input, None).await
    }

    async fn run_turn(
        &self,
        session_id: Uuid,
        ctx: SessionContext,
        user_input: &str,
        parent_interaction_id: Option<Uuid>,
    ) -> Result<Interaction> {
        let Some(client) = ctx.client.clone() else {
            let response = fallback_response("unknown".to_string(), ContextType::Basic);
            return self
                .store
                .append_interaction(
                    session_id,
                    NewInteraction { user_input: user_input.to_string(), ai_response: response, parent_interaction_id },
                )
                .await;
        };

        let transcript = format_transcript(&ctx.interactions);
        let analyzer_output = self
            .analyzer
            .analyze(&transcript, Some(&ctx.session.cumulative_psychology), ctx.session.psychology_confidence)
            .await;

        let archetype = self.archetype_service.determine_archetype(&analyzer_output.cumulative_psychology);

        let holistic_profile = self
            .synthesizer
            .synthesize(&analyzer_output.cumulative_psychology, analyzer_output.psychology_confidence)
            .await;

        let (persist_result, indicators) = tokio::join!(
            self.store.persist_analysis(
                session_id,
                AnalysisUpdate {
                    cumulative_psychology: analyzer_output.cumulative_psychology.clone(),
                    psychology_confidence: analyzer_output.psychology_confidence,
                    active_clarifying_questions: analyzer_output.suggested_questions.clone(),
                    customer_archetype: Some(archetype.clone()),
                    sales_indicators: None,
                    holistic_psychometric_profile: Some(holistic_profile.clone()),
                    psychology_updated_at: Utc::now(),
                },
            ),
            self.indicator_generator.derive(&holistic_profile),
        );

        if let Err(e) = persist_result {
            tracing::warn!(error = %e, session_id = %session_id, "analysis persistence failed, continuing with the in-flight response");
        }

        let client_label = client.alias.clone().unwrap_or_else(|| client.id.to_string());
        let mut response = self
            .strategy_generator
            .generate(
                user_input,
                &client_label,
                &history_lines(&ctx.interactions),
                Some(&analyzer_output.cumulative_psychology),
                Some(&holistic_profile),
                Some(&archetype),
            )
            .await;
        response.sales_indicators = Some(indicators);

        self.store
            .append_interaction(
                session_id,
                NewInteraction { user_input: user_input.to_string(), ai_response: response, parent_interaction_id },
            )
            .await
    }
}
