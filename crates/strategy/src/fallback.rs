//! The branded fallback strategy response returned whenever generation
//! fails at any stage — RAG, the LLM call, or parsing.

use tesla_copilot_core::{
    ContextType, ObjectionHandling, QuickResponse, StrategyResponse, SuggestedAction, UrgencyLevel,
};

/// Canonical Tesla advantages to fall back on when the model is unavailable —
/// restated regardless of archetype or conversation context.
fn brand_advantage_actions() -> Vec<SuggestedAction> {
    vec![
        SuggestedAction {
            action: "Highlight the Supercharger network".to_string(),
            reasoning: "Largest fast-charging network in the world; no competitor matches its coverage."
                .to_string(),
        },
        SuggestedAction {
            action: "Mention over-the-air software updates".to_string(),
            reasoning: "The car keeps improving after purchase, a capability the competition doesn't offer."
                .to_string(),
        },
        SuggestedAction {
            action: "Bring up total cost of ownership".to_string(),
            reasoning: "Lower fuel and service costs make Tesla a stronger long-term value than it first appears."
                .to_string(),
        },
        SuggestedAction {
            action: "Cite Tesla's safety ratings".to_string(),
            reasoning: "Top crash-test ratings address safety concerns before they're raised.".to_string(),
        },
    ]
}

pub fn fallback_response(client_archetype: String, context_type: ContextType) -> StrategyResponse {
    StrategyResponse {
        quick_response: QuickResponse {
            id: format!("qr_{}", uuid::Uuid::new_v4().simple().to_string().get(..6).unwrap_or("000000")),
            text: "Thanks for sharing that — tell me a bit more about what matters most to you in your next vehicle."
                .to_string(),
            tone: "neutral, exploratory".to_string(),
            key_points: vec![],
        },
        main_analysis: "Not enough signal yet to produce a grounded analysis.".to_string(),
        suggested_actions: brand_advantage_actions(),
        suggested_questions: vec![],
        strategic_recommendation: "Keep the conversation open-ended and listen for what the customer leads with."
            .to_string(),
        next_best_action: "Ask an open-ended question about their priorities.".to_string(),
        follow_up_timing: None,
        objection_handling: ObjectionHandling::default(),
        buy_signals: vec![],
        risk_signals: vec![],
        sentiment_score: 5,
        potential_score: 5,
        urgency_level: UrgencyLevel::Low,
        client_archetype,
        confidence_level: 20,
        likely_archetypes: vec![],
        strategic_notes: vec!["generated without model assistance".to_string()],
        generated_at: chrono::Utc::now(),
        model_used: "fallback".to_string(),
        context_type,
        is_fallback: true,
        sales_indicators: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_marked_and_has_floor_confidence() {
        let response = fallback_response("pragmatic_analyst".to_string(), ContextType::Basic);
        assert!(response.is_fallback);
        assert_eq!(response.confidence_level, 20);
        assert!(response.quick_response.id.starts_with("qr_"));
    }

    #[test]
    fn fallback_restates_at_least_three_brand_advantages() {
        let response = fallback_response("pragmatic_analyst".to_string(), ContextType::Basic);
        assert!(response.suggested_actions.len() >= 3);
        assert!(response.suggested_actions.iter().all(|a| !a.action.is_empty() && !a.reasoning.is_empty()));
    }
}
