//! C6: synthesizes a raw psychometric profile into a "customer DNA".

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tesla_copilot_core::{CommunicationStyle, CumulativePsychology, HolisticProfile, TtlLruCache};
use tesla_copilot_llm::LlmGateway;

use crate::cache_key::cache_key;

const TTL_SECS: u64 = 3600;
const MAX_SIZE: usize = 128;

const SYSTEM_PROMPT: &str = r#"You synthesize a raw Big Five / DISC / Schwartz psychometric profile into a single holistic "customer DNA" summary for a seller to act on.

Respond with a single JSON object with exactly these fields: holistic_summary (2-3 sentences), main_drive (one phrase), communication_style (object with recommended_tone, keywords_to_use, keywords_to_avoid), key_levers (array of short strings), red_flags (array of short strings)."#;

pub struct HolisticSynthesizer {
    gateway: Arc<LlmGateway>,
    cache: TtlLruCache<String, HolisticProfile>,
}

impl HolisticSynthesizer {
    pub fn new(gateway: Arc<LlmGateway>) -> Self {
        Self {
            gateway,
            cache: TtlLruCache::new(Duration::from_secs(TTL_SECS), MAX_SIZE),
        }
    }

    pub async fn synthesize(&self, raw_profile: &CumulativePsychology, raw_confidence: u8) -> HolisticProfile {
        if !raw_profile.big_five_complete() || raw_confidence < 20 {
            return fallback_profile(raw_confidence);
        }

        let key = cache_key("synthesis", raw_profile);
        if let Some(mut cached) = self.cache.get(&key) {
            cached.synthesis_ts = chrono::Utc::now();
            return cached;
        }

        let user_prompt = format!(
            "Raw profile:\n{}",
            serde_json::to_string_pretty(raw_profile).unwrap_or_default()
        );

        let completion = match self.gateway.generate(SYSTEM_PROMPT, &user_prompt, "synthesis", true).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "holistic synthesis falling back: llm call failed");
                return fallback_profile(raw_confidence);
            }
        };

        let value = match tesla_copilot_core::parse_outermost_json::<Value>(&completion.content) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "holistic synthesis falling back: unparsable response");
                return fallback_profile(raw_confidence);
            }
        };

        let profile = match parse_profile(&value, raw_confidence) {
            Some(p) => p,
            None => {
                tracing::warn!("holistic synthesis falling back: missing required fields");
                return fallback_profile(raw_confidence);
            }
        };

        self.cache.put(key, profile.clone());
        profile
    }
}

fn parse_profile(value: &Value, raw_confidence: u8) -> Option<HolisticProfile> {
    let holistic_summary = value.get("holistic_summary")?.as_str()?.to_string();
    let main_drive = value.get("main_drive")?.as_str()?.to_string();
    let communication_style_value = value.get("communication_style")?;
    let communication_style = CommunicationStyle {
        recommended_tone: communication_style_value
            .get("recommended_tone")?
            .as_str()?
            .to_string(),
        keywords_to_use: string_array(communication_style_value.get("keywords_to_use")),
        keywords_to_avoid: string_array(communication_style_value.get("keywords_to_avoid")),
    };
    let key_levers = string_array(value.get("key_levers"));
    let red_flags = string_array(value.get("red_flags"));

    Some(HolisticProfile {
        holistic_summary,
        main_drive,
        communication_style,
        key_levers,
        red_flags,
        missing_data_gaps: value
            .get("missing_data_gaps")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        confidence: raw_confidence,
        is_fallback: false,
        synthesis_ts: chrono::Utc::now(),
        source_confidence: raw_confidence,
    })
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

pub fn fallback_profile(raw_confidence: u8) -> HolisticProfile {
    HolisticProfile {
        holistic_summary: "Not enough evidence yet to synthesize a holistic read on this customer.".to_string(),
        main_drive: "unknown — continue the conversation to surface a dominant motivator".to_string(),
        communication_style: CommunicationStyle {
            recommended_tone: "neutral, exploratory".to_string(),
            keywords_to_use: vec!["tell me more".to_string(), "what matters most to you".to_string()],
            keywords_to_avoid: vec!["assuming you want".to_string()],
        },
        key_levers: vec!["ask open-ended questions to build the profile".to_string()],
        red_flags: vec!["proceeding on an incomplete profile risks misreading the customer".to_string()],
        missing_data_gaps: "Big Five profile incomplete or confidence below synthesis threshold".to_string(),
        confidence: 30,
        is_fallback: true,
        synthesis_ts: chrono::Utc::now(),
        source_confidence: raw_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_profile_is_marked_and_has_generic_content() {
        let profile = fallback_profile(10);
        assert!(profile.is_fallback);
        assert_eq!(profile.confidence, 30);
        assert!(!profile.key_levers.is_empty());
    }
}
