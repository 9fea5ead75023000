//! The four derived sales indicators.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureLevel {
    Cold,
    Warm,
    Hot,
}

impl TemperatureLevel {
    /// cold <= 33, warm <= 66, else hot.
    pub fn from_value(value: u8) -> Self {
        match value {
            0..=33 => TemperatureLevel::Cold,
            34..=66 => TemperatureLevel::Warm,
            _ => TemperatureLevel::Hot,
        }
    }

    pub fn matches(&self, value: u8) -> bool {
        *self == Self::from_value(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStage {
    Awareness,
    Interest,
    Consideration,
    Evaluation,
    Decision,
    Purchase,
}

impl JourneyStage {
    pub const ORDER: [JourneyStage; 6] = [
        JourneyStage::Awareness,
        JourneyStage::Interest,
        JourneyStage::Consideration,
        JourneyStage::Evaluation,
        JourneyStage::Decision,
        JourneyStage::Purchase,
    ];

    pub fn next(&self) -> Option<JourneyStage> {
        let idx = Self::ORDER.iter().position(|s| s == self)?;
        Self::ORDER.get(idx + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyStage::Awareness => "awareness",
            JourneyStage::Interest => "interest",
            JourneyStage::Consideration => "consideration",
            JourneyStage::Evaluation => "evaluation",
            JourneyStage::Decision => "decision",
            JourneyStage::Purchase => "purchase",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// low <= 33, medium <= 66, else high.
    pub fn from_value(value: u8) -> Self {
        match value {
            0..=33 => RiskLevel::Low,
            34..=66 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn matches(&self, value: u8) -> bool {
        *self == Self::from_value(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseTemperature {
    pub value: u8,
    pub level: TemperatureLevel,
    pub rationale: String,
    pub strategy: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerJourneyStage {
    pub value: JourneyStage,
    pub progress_percentage: u8,
    pub next_stage: JourneyStage,
    pub rationale: String,
    pub strategy: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnRisk {
    pub value: u8,
    pub level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub rationale: String,
    pub strategy: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPotential {
    /// Currency amount, non-negative.
    pub value: f64,
    pub probability: u8,
    pub estimated_timeframe: String,
    pub rationale: String,
    pub strategy: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesIndicators {
    pub purchase_temperature: PurchaseTemperature,
    pub customer_journey_stage: CustomerJourneyStage,
    pub churn_risk: ChurnRisk,
    pub sales_potential: SalesPotential,
    #[serde(default)]
    pub is_fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_bands_match_spec_boundaries() {
        assert_eq!(TemperatureLevel::from_value(0), TemperatureLevel::Cold);
        assert_eq!(TemperatureLevel::from_value(33), TemperatureLevel::Cold);
        assert_eq!(TemperatureLevel::from_value(34), TemperatureLevel::Warm);
        assert_eq!(TemperatureLevel::from_value(66), TemperatureLevel::Warm);
        assert_eq!(TemperatureLevel::from_value(67), TemperatureLevel::Hot);
        assert_eq!(TemperatureLevel::from_value(100), TemperatureLevel::Hot);
    }

    #[test]
    fn risk_bands_match_spec_boundaries() {
        assert_eq!(RiskLevel::from_value(33), RiskLevel::Low);
        assert_eq!(RiskLevel::from_value(34), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_value(67), RiskLevel::High);
    }

    #[test]
    fn journey_stage_ordering_is_fixed() {
        assert_eq!(JourneyStage::Awareness.next(), Some(JourneyStage::Interest));
        assert_eq!(JourneyStage::Purchase.next(), None);
    }
}
