//! Parses the outermost JSON object from a strategy-generation completion
//! into a [`StrategyResponse`], filling missing optional collections with
//! neutral defaults rather than failing the whole response.

use serde_json::Value;
use tesla_copilot_core::{
    ContextType, LikelyArchetype, ObjectionHandling, QuickResponse, StrategyResponse,
    SuggestedAction, SuggestedQuestion, UrgencyLevel,
};

fn string_field(value: &Value, field: &str) -> String {
    value.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

fn parse_urgency(value: Option<&Value>) -> UrgencyLevel {
    match value.and_then(Value::as_str) {
        Some("high") => UrgencyLevel::High,
        Some("medium") => UrgencyLevel::Medium,
        _ => UrgencyLevel::Low,
    }
}

/// The minimum fields a strategy completion must carry to be trusted; every
/// other field is reconstructed with a neutral default if absent.
pub fn parse_strategy_response(
    value: &Value,
    quick_response_id: String,
    question_ids: &[String],
    client_archetype: String,
    context_type: ContextType,
    model_used: String,
) -> Option<StrategyResponse> {
    let quick_response_value = value.get("quick_response")?;
    let main_analysis = value.get("main_analysis")?.as_str()?.to_string();
    let strategic_recommendation = value.get("strategic_recommendation")?.as_str()?.to_string();
    let next_best_action = value.get("next_best_action")?.as_str()?.to_string();

    let quick_response = QuickResponse {
        id: quick_response_id,
        text: quick_response_value.get("text")?.as_str()?.to_string(),
        tone: string_field(quick_response_value, "tone"),
        key_points: string_array(quick_response_value.get("key_points")),
    };

    let suggested_actions = value
        .get("suggested_actions")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|a| {
                    Some(SuggestedAction {
                        action: a.get("action")?.as_str()?.to_string(),
                        reasoning: string_field(a, "reasoning"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let raw_questions = value
        .get("suggested_questions")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let suggested_questions = raw_questions
        .iter()
        .enumerate()
        .filter_map(|(i, q)| {
            let text = q.get("text").and_then(Value::as_str)?.to_string();
            let id = question_ids.get(i).cloned().unwrap_or_else(|| format!("q_{i}"));
            Some(SuggestedQuestion { id, text })
        })
        .collect();

    let objection_handling = value
        .get("objection_handling")
        .map(|o| ObjectionHandling {
            potential_objections: string_array(o.get("potential_objections")),
            responses: string_array(o.get("responses")),
        })
        .unwrap_or_default();

    let likely_archetypes = value
        .get("likely_archetypes")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|a| {
                    Some(LikelyArchetype {
                        name: a.get("name")?.as_str()?.to_string(),
                        confidence: a.get("confidence").and_then(Value::as_u64).unwrap_or(50) as u8,
                        description: string_field(a, "description"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(StrategyResponse {
        quick_response,
        main_analysis,
        suggested_actions,
        suggested_questions,
        strategic_recommendation,
        next_best_action,
        follow_up_timing: value.get("follow_up_timing").and_then(Value::as_str).map(str::to_string),
        objection_handling,
        buy_signals: string_array(value.get("buy_signals")),
        risk_signals: string_array(value.get("risk_signals")),
        sentiment_score: value.get("sentiment_score").and_then(Value::as_u64).unwrap_or(5).clamp(1, 10) as u8,
        potential_score: value.get("potential_score").and_then(Value::as_u64).unwrap_or(5).clamp(1, 10) as u8,
        urgency_level: parse_urgency(value.get("urgency_level")),
        client_archetype,
        confidence_level: 0,
        likely_archetypes,
        strategic_notes: string_array(value.get("strategic_notes")),
        generated_at: chrono::Utc::now(),
        model_used,
        context_type,
        is_fallback: false,
        sales_indicators: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_minimal_valid_response() {
        let value = json!({
            "quick_response": {"text": "Let's talk range.", "tone": "warm"},
            "main_analysis": "customer is price-anchored",
            "strategic_recommendation": "lead with total cost of ownership",
            "next_best_action": "offer a test drive",
        });
        let parsed = parse_strategy_response(
            &value,
            "qr_abc123".to_string(),
            &[],
            "pragmatic_analyst".to_string(),
            ContextType::Basic,
            "test-model".to_string(),
        );
        assert!(parsed.is_some());
        let response = parsed.unwrap();
        assert_eq!(response.quick_response.text, "Let's talk range.");
        assert!(response.suggested_actions.is_empty());
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        let value = json!({"quick_response": {"text": "hi", "tone": "warm"}});
        let parsed = parse_strategy_response(
            &value,
            "qr_abc123".to_string(),
            &[],
            "pragmatic_analyst".to_string(),
            ContextType::Basic,
            "test-model".to_string(),
        );
        assert!(parsed.is_none());
    }

    #[test]
    fn suggested_questions_get_assigned_ids_in_order() {
        let value = json!({
            "quick_response": {"text": "t", "tone": "warm"},
            "main_analysis": "a",
            "strategic_recommendation": "s",
            "next_best_action": "n",
            "suggested_questions": [{"text": "one"}, {"text": "two"}],
        });
        let ids = vec!["q_aaa".to_string(), "q_bbb".to_string()];
        let parsed = parse_strategy_response(
            &value,
            "qr_x".to_string(),
            &ids,
            "pragmatic_analyst".to_string(),
            ContextType::Basic,
            "test-model".to_string(),
        )
        .unwrap();
        assert_eq!(parsed.suggested_questions[0].id, "q_aaa");
        assert_eq!(parsed.suggested_questions[1].id, "q_bbb");
    }
}
