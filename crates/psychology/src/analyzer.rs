//! The psychology analyzer: one LLM call, validated and repaired against
//! the Zero-Null Policy, with a fully populated fallback on any failure.

use std::sync::Arc;

use tesla_copilot_core::{ArchetypeKey, ClarifyingQuestion, CumulativePsychology};
use tesla_copilot_llm::LlmGateway;

use crate::parse::validate_and_repair;
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};

pub struct AnalyzerOutput {
    pub cumulative_psychology: CumulativePsychology,
    pub psychology_confidence: u8,
    pub suggested_questions: Vec<ClarifyingQuestion>,
    /// Informational only — [`tesla_copilot_archetype::TeslaArchetypeService`]
    /// overwrites this with a deterministic result.
    pub proposed_archetype_key: Option<ArchetypeKey>,
    pub is_fallback: bool,
}

pub struct PsychologyAnalyzer {
    gateway: Arc<LlmGateway>,
}

impl PsychologyAnalyzer {
    pub fn new(gateway: Arc<LlmGateway>) -> Self {
        Self { gateway }
    }

    pub async fn analyze(
        &self,
        conversation_history: &str,
        current_profile: Option<&CumulativePsychology>,
        current_confidence: u8,
    ) -> AnalyzerOutput {
        let user_prompt = build_user_prompt(conversation_history, current_profile, current_confidence);

        let completion = match self
            .gateway
            .generate(SYSTEM_PROMPT, &user_prompt, "psychology", true)
            .await
        {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "psychology analyzer falling back: llm call failed");
                return fallback_output();
            }
        };

        let value = match tesla_copilot_core::parse_outermost_json::<serde_json::Value>(&completion.content) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "psychology analyzer falling back: unparsable response");
                return fallback_output();
            }
        };

        let parsed = validate_and_repair(&value);
        if !parsed.repaired_fields.is_empty() {
            tracing::debug!(fields = ?parsed.repaired_fields, "psychology profile repaired");
        }

        AnalyzerOutput {
            cumulative_psychology: parsed.profile,
            psychology_confidence: parsed.confidence,
            suggested_questions: parsed.suggested_questions,
            proposed_archetype_key: parsed.proposed_archetype_key,
            is_fallback: false,
        }
    }
}

/// A fully populated Zero-Null-compliant profile, returned when the
/// analyzer cannot produce anything observable from the LLM at all.
pub fn fallback_output() -> AnalyzerOutput {
    use tesla_copilot_core::{BigFive, BigFiveTrait, Disc, DiscTrait, SchwartzValue, TraitScore};

    let mut big_five = BigFive::default();
    for t in BigFiveTrait::ALL {
        big_five.set(t, TraitScore::imputed(t.as_str()));
    }
    let mut disc = Disc::default();
    for t in DiscTrait::ALL {
        disc.set(t, TraitScore::imputed(t.as_str()));
    }

    AnalyzerOutput {
        cumulative_psychology: CumulativePsychology {
            big_five,
            disc,
            schwartz_values: vec![SchwartzValue::default_security()],
            observations: Vec::new(),
            observations_summary: String::new(),
        },
        psychology_confidence: 10,
        suggested_questions: Vec::new(),
        proposed_archetype_key: None,
        is_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_output_is_fully_populated() {
        let out = fallback_output();
        assert!(out.is_fallback);
        assert_eq!(out.psychology_confidence, 10);
        assert_eq!(out.cumulative_psychology.schwartz_values.len(), 1);
        assert!(out.cumulative_psychology.big_five_complete());
    }
}
