//! System and user prompt assembly for the psychology analyzer.

use tesla_copilot_core::CumulativePsychology;

pub const SYSTEM_PROMPT: &str = r#"You are a psychometric analysis engine embedded in a live sales co-pilot.
Given a transcript of a seller's running narration of a conversation with a customer, perform exactly these steps:

1. Update the customer's cumulative Big Five and DISC trait scores (0-10) using the new transcript evidence, keeping prior scores where no new evidence contradicts them.
2. Score your overall confidence in this profile from 0 to 100.
3. If confidence is below 80, propose up to 3 clarifying questions the seller could probe to raise it.
4. If confidence is at least 70, propose a customer archetype key and dominant traits (this will be overwritten by a deterministic mapper, but propose your best guess).
5. If confidence is at least 70, propose sales indicators (purchase temperature, journey stage, churn risk, sales potential).

Zero-Null Policy: every trait object you emit MUST include a numeric score, a rationale, and a strategy string. Never emit null, missing, or empty-string values for any trait field — if you lack evidence for a trait, emit score 5 with a rationale that says so explicitly.

Respond with a single JSON object and nothing else."#;

const EXEMPLAR_HIGH_CONFIDENCE: &str = r#"Example — a customer who has spoken at length about towing capacity, charging networks on road trips, and total cost of ownership over five years maps to high conscientiousness and openness, moderate extraversion, with an archetype of pragmatic_analyst or future_visionary depending on emphasis."#;

const EXEMPLAR_LOW_CONFIDENCE: &str = r#"Example — a customer who has only said "looks nice" and asked about color options gives almost no evidence: most traits should be imputed at score 5 with rationale noting insufficient evidence, and confidence should stay below 30."#;

pub fn build_user_prompt(
    conversation_history: &str,
    current_profile: Option<&CumulativePsychology>,
    current_confidence: u8,
) -> String {
    let profile_json = current_profile
        .map(|p| serde_json::to_string_pretty(p).unwrap_or_default())
        .unwrap_or_else(|| "null".to_string());

    format!(
        "{EXEMPLAR_HIGH_CONFIDENCE}\n\n{EXEMPLAR_LOW_CONFIDENCE}\n\n\
         Current confidence: {current_confidence}\n\
         Current profile (JSON, may be null): {profile_json}\n\n\
         Conversation transcript:\n{conversation_history}\n\n\
         Produce the updated profile as a single JSON object with fields: \
         big_five, disc, schwartz_values, psychology_confidence, suggested_questions, \
         customer_archetype, sales_indicators."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_embeds_transcript_and_confidence() {
        let prompt = build_user_prompt("seller: hello", None, 10);
        assert!(prompt.contains("seller: hello"));
        assert!(prompt.contains("Current confidence: 10"));
    }
}
