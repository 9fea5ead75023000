//! The composite tactical response the strategy generator produces, stored
//! verbatim as `Interaction.ai_response`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextType {
    UltraBrainComplete,
    HolisticProfile,
    ArchetypeOnly,
    Basic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickResponse {
    pub id: String,
    pub text: String,
    pub tone: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub action: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedQuestion {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectionHandling {
    pub potential_objections: Vec<String>,
    pub responses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelyArchetype {
    pub name: String,
    pub confidence: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResponse {
    pub quick_response: QuickResponse,
    pub main_analysis: String,
    pub suggested_actions: Vec<SuggestedAction>,
    pub suggested_questions: Vec<SuggestedQuestion>,
    pub strategic_recommendation: String,
    pub next_best_action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_timing: Option<String>,
    pub objection_handling: ObjectionHandling,
    #[serde(default)]
    pub buy_signals: Vec<String>,
    #[serde(default)]
    pub risk_signals: Vec<String>,
    /// 1..10
    pub sentiment_score: u8,
    /// 1..10
    pub potential_score: u8,
    pub urgency_level: UrgencyLevel,
    pub client_archetype: String,
    /// 0..100
    pub confidence_level: u8,
    pub likely_archetypes: Vec<LikelyArchetype>,
    #[serde(default)]
    pub strategic_notes: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub model_used: String,
    pub context_type: ContextType,
    #[serde(default)]
    pub is_fallback: bool,
    /// Populated by the orchestrator after C7 runs; absent while the
    /// strategy generator itself is producing the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_indicators: Option<super::indicators::SalesIndicators>,
}
