//! C7: derives the four sales indicators from a customer DNA.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tesla_copilot_core::{
    ChurnRisk, CustomerJourneyStage, HolisticProfile, JourneyStage, PurchaseTemperature,
    RiskLevel, SalesIndicators, SalesPotential, TemperatureLevel, TtlLruCache,
};
use tesla_copilot_llm::LlmGateway;

use crate::cache_key::cache_key;

const TTL_SECS: u64 = 3600;
const MAX_SIZE: usize = 128;

const SYSTEM_PROMPT: &str = r#"You derive four sales indicators from a customer's holistic psychometric DNA.

Indicators:
- purchase_temperature: 0-100, cold/warm/hot band.
- customer_journey_stage: one of awareness, interest, consideration, evaluation, decision, purchase, with a progress percentage 0-100 within that stage.
- churn_risk: 0-100, low/medium/high band, with named risk factors.
- sales_potential: an estimated deal value in the vendor's currency and a probability 0-100, with an estimated timeframe.

Rules:
- Indicators MUST be mutually coherent: a "hot" temperature paired with an "awareness" stage is inconsistent and forbidden.
- Indicators MUST reflect the archetype implied by the DNA.
- B2B deal values range 100,000-10,000,000; B2C deal values range 50,000-500,000.

Respond with a single JSON object with fields: purchase_temperature, customer_journey_stage, churn_risk, sales_potential, each an object with the fields described above plus rationale, strategy, confidence (0-100)."#;

pub struct SalesIndicatorGenerator {
    gateway: Arc<LlmGateway>,
    cache: TtlLruCache<String, SalesIndicators>,
}

impl SalesIndicatorGenerator {
    pub fn new(gateway: Arc<LlmGateway>) -> Self {
        Self {
            gateway,
            cache: TtlLruCache::new(Duration::from_secs(TTL_SECS), MAX_SIZE),
        }
    }

    pub async fn derive(&self, holistic_profile: &HolisticProfile) -> SalesIndicators {
        if holistic_profile.is_fallback {
            return fallback_indicators();
        }

        let key = cache_key("indicators", holistic_profile);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let user_prompt = format!(
            "Customer DNA:\n{}",
            serde_json::to_string_pretty(holistic_profile).unwrap_or_default()
        );

        let completion = match self.gateway.generate(SYSTEM_PROMPT, &user_prompt, "indicators", true).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "sales indicator generation falling back: llm call failed");
                return fallback_indicators();
            }
        };

        let value = match tesla_copilot_core::parse_outermost_json::<Value>(&completion.content) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "sales indicator generation falling back: unparsable response");
                return fallback_indicators();
            }
        };

        let indicators = match parse_indicators(&value) {
            Some(i) => i,
            None => {
                tracing::warn!("sales indicator generation falling back: missing required fields");
                return fallback_indicators();
            }
        };

        self.cache.put(key, indicators.clone());
        indicators
    }
}

fn parse_indicators(value: &Value) -> Option<SalesIndicators> {
    let temp = value.get("purchase_temperature")?;
    let temp_value = temp.get("value")?.as_u64()? as u8;
    let purchase_temperature = PurchaseTemperature {
        value: temp_value,
        level: TemperatureLevel::from_value(temp_value),
        rationale: string_field(temp, "rationale"),
        strategy: string_field(temp, "strategy"),
        confidence: temp.get("confidence").and_then(Value::as_u64).unwrap_or(50) as u8,
    };

    let stage = value.get("customer_journey_stage")?;
    let stage_value = parse_stage(stage.get("value")?.as_str()?)?;
    let customer_journey_stage = CustomerJourneyStage {
        value: stage_value,
        progress_percentage: stage.get("progress_percentage").and_then(Value::as_u64).unwrap_or(0) as u8,
        next_stage: stage_value.next().unwrap_or(JourneyStage::Purchase),
        rationale: string_field(stage, "rationale"),
        strategy: string_field(stage, "strategy"),
        confidence: stage.get("confidence").and_then(Value::as_u64).unwrap_or(50) as u8,
    };

    let risk = value.get("churn_risk")?;
    let risk_value = risk.get("value")?.as_u64()? as u8;
    let churn_risk = ChurnRisk {
        value: risk_value,
        level: RiskLevel::from_value(risk_value),
        risk_factors: value
            .get("churn_risk")
            .and_then(|v| v.get("risk_factors"))
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default(),
        rationale: string_field(risk, "rationale"),
        strategy: string_field(risk, "strategy"),
        confidence: risk.get("confidence").and_then(Value::as_u64).unwrap_or(50) as u8,
    };

    let potential = value.get("sales_potential")?;
    let sales_potential = SalesPotential {
        value: potential.get("value")?.as_f64()?,
        probability: potential.get("probability").and_then(Value::as_u64).unwrap_or(40) as u8,
        estimated_timeframe: string_field(potential, "estimated_timeframe"),
        rationale: string_field(potential, "rationale"),
        strategy: string_field(potential, "strategy"),
        confidence: potential.get("confidence").and_then(Value::as_u64).unwrap_or(50) as u8,
    };

    Some(SalesIndicators {
        purchase_temperature,
        customer_journey_stage,
        churn_risk,
        sales_potential,
        is_fallback: false,
    })
}

fn string_field(value: &Value, field: &str) -> String {
    value.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn parse_stage(s: &str) -> Option<JourneyStage> {
    match s {
        "awareness" => Some(JourneyStage::Awareness),
        "interest" => Some(JourneyStage::Interest),
        "consideration" => Some(JourneyStage::Consideration),
        "evaluation" => Some(JourneyStage::Evaluation),
        "decision" => Some(JourneyStage::Decision),
        "purchase" => Some(JourneyStage::Purchase),
        _ => None,
    }
}

pub fn fallback_indicators() -> SalesIndicators {
    SalesIndicators {
        purchase_temperature: PurchaseTemperature {
            value: 50,
            level: TemperatureLevel::Warm,
            rationale: "insufficient data — neutral temperature assumed".to_string(),
            strategy: "continue gathering signal before committing to a pace".to_string(),
            confidence: 10,
        },
        customer_journey_stage: CustomerJourneyStage {
            value: JourneyStage::Consideration,
            progress_percentage: 40,
            next_stage: JourneyStage::Evaluation,
            rationale: "insufficient data — mid-funnel assumed as a safe default".to_string(),
            strategy: "ask questions that would indicate evaluation-stage behavior".to_string(),
            confidence: 10,
        },
        churn_risk: ChurnRisk {
            value: 50,
            level: RiskLevel::Medium,
            risk_factors: vec!["profile incomplete".to_string()],
            rationale: "insufficient data — neutral risk assumed".to_string(),
            strategy: "re-engage to reduce uncertainty".to_string(),
            confidence: 10,
        },
        sales_potential: SalesPotential {
            value: 50_000.0,
            probability: 40,
            estimated_timeframe: "3-6 months".to_string(),
            rationale: "insufficient data — mid-band B2C estimate assumed".to_string(),
            strategy: "qualify budget and timeline directly".to_string(),
            confidence: 10,
        },
        is_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_indicators_all_have_confidence_ten() {
        let indicators = fallback_indicators();
        assert_eq!(indicators.purchase_temperature.confidence, 10);
        assert_eq!(indicators.customer_journey_stage.confidence, 10);
        assert_eq!(indicators.churn_risk.confidence, 10);
        assert_eq!(indicators.sales_potential.confidence, 10);
        assert!(indicators.is_fallback);
    }

    #[test]
    fn fallback_temperature_and_stage_match_contracted_neutral_values() {
        let indicators = fallback_indicators();
        assert_eq!(indicators.purchase_temperature.value, 50);
        assert_eq!(indicators.purchase_temperature.level, TemperatureLevel::Warm);
        assert_eq!(indicators.customer_journey_stage.value, JourneyStage::Consideration);
        assert_eq!(indicators.customer_journey_stage.progress_percentage, 40);
    }
}
