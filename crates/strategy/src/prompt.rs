//! Layered system/user prompt assembly, with the brand-loyalty and
//! archetype-sovereignty rules embedded literally rather than left to the
//! model's judgment.

use tesla_copilot_core::{
    BigFiveTrait, CumulativePsychology, CustomerArchetype, DiscTrait, HolisticProfile,
};

pub const BRAND_SYSTEM_PROMPT: &str = r#"You are a real-time sales strategy engine for a seller narrating a live conversation with a prospective customer of an electric vehicle brand.

Mission: turn the seller's narration into an immediately actionable, psychologically grounded response.

Competitor handling — non-negotiable: never recommend, praise, or suggest a trial of a competitor's product. If the customer praises a competitor, acknowledge it briefly and redirect to a vendor-specific advantage: supercharging network coverage, over-the-air software updates, safety ratings, or total cost of ownership.

Golden rules:
1. Archetype sovereignty — when a customer archetype is present, it IS the strategic directive. Raw psychological trait scores only refine tone and vocabulary; they never override the archetype's do/don't playbook.
2. Quick response is holistic — derive it from the entire session history, not just the latest line.
3. Suggested questions are atomic — derive them only from the latest utterance, never from earlier context.

Respond with a single JSON object matching the contracted StrategyResponse shape and nothing else."#;

pub fn format_knowledge_context(results: &[(String, String, String, f32)]) -> String {
    if results.is_empty() {
        return String::new();
    }
    let mut block = String::from("Relevant knowledge:\n");
    for (title, kind, content, similarity) in results {
        block.push_str(&format!(
            "- [{kind}] {title} ({:.0}% match): {content}\n",
            similarity * 100.0
        ));
    }
    block
}

pub fn format_dna_block(holistic: &HolisticProfile) -> String {
    format!(
        "Customer DNA:\nSummary: {}\nMain drive: {}\nRecommended tone: {}\nKey levers: {}\nRed flags: {}",
        holistic.holistic_summary,
        holistic.main_drive,
        holistic.communication_style.recommended_tone,
        holistic.key_levers.join("; "),
        holistic.red_flags.join("; "),
    )
}

pub fn format_archetype_block(archetype: &CustomerArchetype) -> String {
    format!(
        "Customer archetype: {} — {}\nDo: {}\nDon't: {}",
        archetype.name,
        archetype.description,
        archetype.sales_strategy.do_list.join("; "),
        archetype.sales_strategy.dont_list.join("; "),
    )
}

/// Traits scoring ≥7 are summarized as "high X", ≤3 as "low X". Both Big
/// Five and DISC traits are eligible — the data model treats them as
/// structurally identical trait objects.
pub fn format_psychology_summary(profile: &CumulativePsychology) -> String {
    let mut high = Vec::new();
    let mut low = Vec::new();

    for t in BigFiveTrait::ALL {
        let score = profile.big_five.score_or_default(t);
        if score >= 7 {
            high.push(t.as_str());
        } else if score <= 3 {
            low.push(t.as_str());
        }
    }
    for t in DiscTrait::ALL {
        let score = profile.disc.score_or_default(t);
        if score >= 7 {
            high.push(t.as_str());
        } else if score <= 3 {
            low.push(t.as_str());
        }
    }

    if high.is_empty() && low.is_empty() {
        return String::new();
    }

    let mut summary = String::from("Psychology summary:");
    for t in &high {
        summary.push_str(&format!(" high {t},"));
    }
    for t in &low {
        summary.push_str(&format!(" low {t},"));
    }
    summary.trim_end_matches(',').to_string()
}

pub fn build_user_prompt(user_input: &str, history_lines: &[String], client_label: &str) -> String {
    let recent_history = history_lines
        .iter()
        .rev()
        .take(5)
        .rev()
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Client: {client_label}\n\nRecent history:\n{recent_history}\n\nLatest observation: {user_input}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn psychology_summary_labels_high_and_low_traits() {
        use tesla_copilot_core::TraitScore;
        let mut profile = CumulativePsychology::default();
        profile.big_five.set(
            BigFiveTrait::Openness,
            TraitScore { score: 9, rationale: String::new(), strategy: String::new() },
        );
        profile.big_five.set(
            BigFiveTrait::Neuroticism,
            TraitScore { score: 2, rationale: String::new(), strategy: String::new() },
        );
        let summary = format_psychology_summary(&profile);
        assert!(summary.contains("high openness"));
        assert!(summary.contains("low neuroticism"));
    }

    #[test]
    fn user_prompt_keeps_only_the_last_five_history_lines() {
        let history: Vec<String> = (1..=8).map(|i| format!("seller: line {i}")).collect();
        let prompt = build_user_prompt("latest", &history, "client-1");
        assert!(prompt.contains("line 8"));
        assert!(!prompt.contains("line 1\n") && !prompt.contains("line 3"));
    }
}
