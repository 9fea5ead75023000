//! C8: the RAG-augmented sales strategy generator.

use std::sync::Arc;

use tesla_copilot_core::{
    ContextType, CumulativePsychology, CustomerArchetype, HolisticProfile, Retriever,
    SearchFilter, StrategyResponse,
};
use tesla_copilot_llm::LlmGateway;

use crate::confidence::calculate_confidence;
use crate::fallback::fallback_response;
use crate::parse::parse_strategy_response;
use crate::prompt::{
    build_user_prompt, format_archetype_block, format_dna_block, format_knowledge_context,
    format_psychology_summary, BRAND_SYSTEM_PROMPT,
};

const KNOWLEDGE_TOP_K: usize = 3;

fn short_id(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &hex[..6])
}

pub struct SalesStrategyGenerator {
    gateway: Arc<LlmGateway>,
    retriever: Option<Arc<dyn Retriever>>,
}

impl SalesStrategyGenerator {
    pub fn new(gateway: Arc<LlmGateway>, retriever: Option<Arc<dyn Retriever>>) -> Self {
        Self { gateway, retriever }
    }

    fn determine_context_type(
        psychology_profile: Option<&CumulativePsychology>,
        holistic_profile: Option<&HolisticProfile>,
        customer_archetype: Option<&CustomerArchetype>,
    ) -> ContextType {
        match (psychology_profile, holistic_profile, customer_archetype) {
            (Some(_), Some(h), Some(_)) if !h.is_fallback => ContextType::UltraBrainComplete,
            (_, Some(h), _) if !h.is_fallback => ContextType::HolisticProfile,
            (_, _, Some(_)) => ContextType::ArchetypeOnly,
            _ => ContextType::Basic,
        }
    }

    async fn knowledge_context(
        &self,
        user_input: &str,
        customer_archetype: Option<&CustomerArchetype>,
    ) -> String {
        let Some(retriever) = &self.retriever else {
            return String::new();
        };

        let filter = SearchFilter {
            archetype: customer_archetype.map(|a| a.key.as_str().to_string()),
            kind: None,
        };

        match retriever.search(user_input, &filter, KNOWLEDGE_TOP_K).await {
            Ok(results) => {
                let rows = results
                    .into_iter()
                    .map(|r| {
                        (
                            r.nugget.title,
                            format!("{:?}", r.nugget.kind).to_lowercase(),
                            r.nugget.content,
                            r.similarity_score,
                        )
                    })
                    .collect::<Vec<_>>();
                format_knowledge_context(&rows)
            }
            Err(e) => {
                tracing::warn!(error = %e, "strategy generation proceeding without knowledge context: retrieval failed");
                String::new()
            }
        }
    }

    fn compose_system_prompt(
        &self,
        knowledge_block: &str,
        holistic_profile: Option<&HolisticProfile>,
        customer_archetype: Option<&CustomerArchetype>,
        psychology_profile: Option<&CumulativePsychology>,
    ) -> String {
        let mut sections = vec![BRAND_SYSTEM_PROMPT.to_string()];

        if !knowledge_block.is_empty() {
            sections.push(knowledge_block.to_string());
        }
        if let Some(h) = holistic_profile {
            if !h.is_fallback {
                sections.push(format_dna_block(h));
            }
        }
        if let Some(a) = customer_archetype {
            sections.push(format_archetype_block(a));
        }
        if let Some(p) = psychology_profile {
            let summary = format_psychology_summary(p);
            if !summary.is_empty() {
                sections.push(summary);
            }
        }

        sections.join("\n\n")
    }

    pub async fn generate(
        &self,
        user_input: &str,
        client_label: &str,
        history_lines: &[String],
        psychology_profile: Option<&CumulativePsychology>,
        holistic_profile: Option<&HolisticProfile>,
        customer_archetype: Option<&CustomerArchetype>,
    ) -> StrategyResponse {
        let context_type = Self::determine_context_type(
            psychology_profile,
            holistic_profile,
            customer_archetype,
        );
        let client_archetype = customer_archetype
            .map(|a| a.key.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let knowledge_block = self.knowledge_context(user_input, customer_archetype).await;
        let system_prompt = self.compose_system_prompt(
            &knowledge_block,
            holistic_profile,
            customer_archetype,
            psychology_profile,
        );
        let user_prompt = build_user_prompt(user_input, history_lines, client_label);

        let completion = match self.gateway.generate(&system_prompt, &user_prompt, "strategy", true).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "strategy generation falling back: llm call failed");
                return fallback_response(client_archetype, context_type);
            }
        };

        let value = match tesla_copilot_core::parse_outermost_json::<serde_json::Value>(&completion.content) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "strategy generation falling back: unparsable response");
                return fallback_response(client_archetype, context_type);
            }
        };

        let quick_response_id = short_id("qr");
        let question_count = value
            .get("suggested_questions")
            .and_then(serde_json::Value::as_array)
            .map(|a| a.len())
            .unwrap_or(0);
        let question_ids: Vec<String> = (0..question_count).map(|_| short_id("q")).collect();

        let mut response = match parse_strategy_response(
            &value,
            quick_response_id,
            &question_ids,
            client_archetype.clone(),
            context_type,
            completion.model,
        ) {
            Some(r) => r,
            None => {
                tracing::warn!("strategy generation falling back: missing required fields");
                return fallback_response(client_archetype, context_type);
            }
        };

        response.confidence_level = calculate_confidence(&response);
        response
    }
}
