//! "Customer DNA" — the holistic synthesis of a raw psychometric profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunicationStyle {
    pub recommended_tone: String,
    #[serde(default)]
    pub keywords_to_use: Vec<String>,
    #[serde(default)]
    pub keywords_to_avoid: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolisticProfile {
    pub holistic_summary: String,
    pub main_drive: String,
    pub communication_style: CommunicationStyle,
    pub key_levers: Vec<String>,
    pub red_flags: Vec<String>,
    pub missing_data_gaps: String,
    /// 0..100
    pub confidence: u8,
    pub is_fallback: bool,
    pub synthesis_ts: DateTime<Utc>,
    /// Confidence of the raw profile this DNA was synthesized from.
    pub source_confidence: u8,
}
