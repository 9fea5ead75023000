//! The five equally-weighted completeness factors behind `confidence_level`.

use tesla_copilot_core::StrategyResponse;

const BRAND_ADVANTAGES: &[&str] = &[
    "supercharg",
    "over-the-air",
    "autopilot",
    "safety rating",
    "total cost of ownership",
    "resale value",
];

fn mentions_at_least_three_brand_advantages(response: &StrategyResponse) -> bool {
    let haystack = format!(
        "{} {} {}",
        response.main_analysis,
        response.quick_response.text,
        response
            .suggested_actions
            .iter()
            .map(|a| a.reasoning.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    )
    .to_lowercase();

    BRAND_ADVANTAGES.iter().filter(|kw| haystack.contains(*kw)).count() >= 3
}

/// Five binary completeness checks, averaged and scaled to a percentage,
/// floored at 20 so a thin-but-valid response is never mistaken for a
/// fallback.
pub fn calculate_confidence(response: &StrategyResponse) -> u8 {
    let factors = [
        !response.quick_response.text.trim().is_empty(),
        !response.strategic_recommendation.trim().is_empty(),
        response.suggested_questions.len() >= 2,
        !response.next_best_action.trim().is_empty(),
        mentions_at_least_three_brand_advantages(response),
    ];

    let satisfied = factors.iter().filter(|f| **f).count();
    let percent = (satisfied * 100) / factors.len();
    percent.max(20) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use tesla_copilot_core::{ContextType, ObjectionHandling, QuickResponse, UrgencyLevel};

    fn base_response() -> StrategyResponse {
        StrategyResponse {
            quick_response: QuickResponse { id: "qr_1".into(), text: String::new(), tone: String::new(), key_points: vec![] },
            main_analysis: String::new(),
            suggested_actions: vec![],
            suggested_questions: vec![],
            strategic_recommendation: String::new(),
            next_best_action: String::new(),
            follow_up_timing: None,
            objection_handling: ObjectionHandling::default(),
            buy_signals: vec![],
            risk_signals: vec![],
            sentiment_score: 5,
            potential_score: 5,
            urgency_level: UrgencyLevel::Low,
            client_archetype: "pragmatic_analyst".into(),
            confidence_level: 0,
            likely_archetypes: vec![],
            strategic_notes: vec![],
            generated_at: chrono::Utc::now(),
            model_used: "test".into(),
            context_type: ContextType::Basic,
            is_fallback: false,
            sales_indicators: None,
        }
    }

    #[test]
    fn all_factors_missing_floors_at_twenty() {
        let response = base_response();
        assert_eq!(calculate_confidence(&response), 20);
    }

    #[test]
    fn all_factors_present_scores_one_hundred() {
        let mut response = base_response();
        response.quick_response.text = "supercharger network covers your commute, over-the-air updates keep it current, and resale value beats the segment.".into();
        response.strategic_recommendation = "lead with total cost of ownership".into();
        response.next_best_action = "schedule a test drive".into();
        response.suggested_questions = vec![
            tesla_copilot_core::SuggestedQuestion { id: "q1".into(), text: "a".into() },
            tesla_copilot_core::SuggestedQuestion { id: "q2".into(), text: "b".into() },
        ];
        assert_eq!(calculate_confidence(&response), 100);
    }
}
