//! Parse the analyzer's raw LLM response and repair it to the Zero-Null Policy.

use serde_json::Value;
use tesla_copilot_core::{
    ArchetypeKey, BigFive, BigFiveTrait, ClarifyingQuestion, CumulativePsychology, Disc,
    DiscTrait, Observation, SchwartzValue, TraitScore,
};

pub struct ParsedPsychology {
    pub profile: CumulativePsychology,
    pub confidence: u8,
    pub suggested_questions: Vec<ClarifyingQuestion>,
    pub proposed_archetype_key: Option<ArchetypeKey>,
    pub repaired_fields: Vec<String>,
}

pub fn validate_and_repair(value: &Value) -> ParsedPsychology {
    let mut repaired_fields = Vec::new();

    let mut big_five = BigFive::default();
    for t in BigFiveTrait::ALL {
        let score = value
            .get("big_five")
            .and_then(|v| v.get(t.as_str()))
            .and_then(trait_score_from_json);
        match score {
            Some(s) => big_five.set(t, s),
            None => {
                repaired_fields.push(format!("big_five.{}", t.as_str()));
                big_five.set(t, TraitScore::imputed(t.as_str()));
            }
        }
    }

    let mut disc = Disc::default();
    for t in DiscTrait::ALL {
        let score = value
            .get("disc")
            .and_then(|v| v.get(t.as_str()))
            .and_then(trait_score_from_json);
        match score {
            Some(s) => disc.set(t, s),
            None => {
                repaired_fields.push(format!("disc.{}", t.as_str()));
                disc.set(t, TraitScore::imputed(t.as_str()));
            }
        }
    }

    let schwartz_values: Vec<SchwartzValue> = value
        .get("schwartz_values")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(schwartz_from_json).collect())
        .unwrap_or_default();
    let schwartz_values = if schwartz_values.is_empty() {
        repaired_fields.push("schwartz_values".to_string());
        vec![SchwartzValue::default_security()]
    } else {
        schwartz_values
    };

    let observations: Vec<Observation> = value
        .get("observations")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(observation_from_json).collect())
        .unwrap_or_default();

    let observations_summary = value
        .get("observations_summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let confidence = value
        .get("psychology_confidence")
        .and_then(Value::as_u64)
        .map(|v| v as u8)
        .filter(|v| *v > 0)
        .unwrap_or_else(|| {
            repaired_fields.push("psychology_confidence".to_string());
            30
        });

    let suggested_questions = value
        .get("suggested_questions")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(question_from_json).collect())
        .unwrap_or_default();

    let proposed_archetype_key = value
        .get("customer_archetype")
        .and_then(|v| v.get("archetype_key"))
        .and_then(Value::as_str)
        .and_then(parse_archetype_key);
    if proposed_archetype_key.is_none() && value.get("customer_archetype").is_some() {
        repaired_fields.push("customer_archetype.archetype_key".to_string());
    }

    ParsedPsychology {
        profile: CumulativePsychology {
            big_five,
            disc,
            schwartz_values,
            observations,
            observations_summary,
        },
        confidence,
        suggested_questions,
        proposed_archetype_key,
        repaired_fields,
    }
}

fn trait_score_from_json(v: &Value) -> Option<TraitScore> {
    let score = v.get("score").and_then(Value::as_u64)?;
    Some(TraitScore {
        score: score as u8,
        rationale: v
            .get("rationale")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        strategy: v
            .get("strategy")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

fn schwartz_from_json(v: &Value) -> Option<SchwartzValue> {
    Some(SchwartzValue {
        name: v.get("name").and_then(Value::as_str)?.to_string(),
        strength: v.get("strength").and_then(Value::as_u64).unwrap_or(5) as u8,
        rationale: v
            .get("rationale")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        strategy: v
            .get("strategy")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        present: v.get("present").and_then(Value::as_bool).unwrap_or(false),
    })
}

fn observation_from_json(v: &Value) -> Option<Observation> {
    Some(Observation {
        question: v.get("question").and_then(Value::as_str)?.to_string(),
        answer: v.get("answer").and_then(Value::as_str).unwrap_or_default().to_string(),
        ts: chrono::Utc::now(),
        target: v.get("target").and_then(Value::as_str).unwrap_or_default().to_string(),
    })
}

fn parse_archetype_key(s: &str) -> Option<ArchetypeKey> {
    match s {
        "status_seeker" => Some(ArchetypeKey::StatusSeeker),
        "family_guardian" => Some(ArchetypeKey::FamilyGuardian),
        "pragmatic_analyst" => Some(ArchetypeKey::PragmaticAnalyst),
        "future_visionary" => Some(ArchetypeKey::FutureVisionary),
        "eco_activist" => Some(ArchetypeKey::EcoActivist),
        "fleet_manager" => Some(ArchetypeKey::FleetManager),
        _ => None,
    }
}

fn question_from_json(v: &Value) -> Option<ClarifyingQuestion> {
    let question = v.get("question").and_then(Value::as_str)?.to_string();
    let target = v
        .get("psychological_target")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(to_clarifying_question(question, target))
}

/// The lexical A/B framing rule: Polish interrogatives map to fixed option pairs.
pub fn to_clarifying_question(question: String, psychological_target: String) -> ClarifyingQuestion {
    let lower = question.to_lowercase();
    let (option_a, option_b) = if lower.starts_with("czy")
        || lower.starts_with("jak często")
        || lower.starts_with("jakie")
    {
        ("confirms".to_string(), "denies".to_string())
    } else if lower.starts_with("jak") {
        ("quickly, directly".to_string(), "slowly, thoroughly".to_string())
    } else if lower.starts_with("co") {
        ("general benefits".to_string(), "technical details".to_string())
    } else {
        ("confirms".to_string(), "denies".to_string())
    };

    ClarifyingQuestion {
        id: uuid::Uuid::new_v4().to_string(),
        question,
        option_a,
        option_b,
        psychological_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_big_five_trait_is_imputed_and_recorded() {
        let value: Value = serde_json::json!({});
        let parsed = validate_and_repair(&value);
        assert_eq!(parsed.profile.big_five.score_or_default(BigFiveTrait::Openness), 5);
        assert!(parsed.repaired_fields.contains(&"big_five.openness".to_string()));
    }

    #[test]
    fn empty_schwartz_values_get_a_default_security_entry() {
        let value: Value = serde_json::json!({});
        let parsed = validate_and_repair(&value);
        assert_eq!(parsed.profile.schwartz_values.len(), 1);
        assert_eq!(parsed.profile.schwartz_values[0].name, "security");
    }

    #[test]
    fn zero_confidence_is_forced_to_thirty() {
        let value: Value = serde_json::json!({ "psychology_confidence": 0 });
        let parsed = validate_and_repair(&value);
        assert_eq!(parsed.confidence, 30);
    }

    #[test]
    fn czy_question_gets_confirms_denies_options() {
        let q = to_clarifying_question("Czy klient lubi technologię?".to_string(), "openness".to_string());
        assert_eq!(q.option_a, "confirms");
        assert_eq!(q.option_b, "denies");
    }

    #[test]
    fn jak_question_gets_pace_options() {
        let q = to_clarifying_question("Jak szybko klient podejmuje decyzje?".to_string(), "conscientiousness".to_string());
        assert_eq!(q.option_a, "quickly, directly");
    }

    #[test]
    fn co_question_gets_benefit_vs_technical_options() {
        let q = to_clarifying_question("Co interesuje klienta najbardziej?".to_string(), "openness".to_string());
        assert_eq!(q.option_a, "general benefits");
    }
}
