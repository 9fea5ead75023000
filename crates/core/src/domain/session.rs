//! Session, Client and Interaction — the record-keeping entities the
//! orchestrator reads and writes through the session state store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::archetype::CustomerArchetype;
use super::clarifying::ClarifyingQuestion;
use super::holistic::HolisticProfile;
use super::indicators::SalesIndicators;
use super::psychology::CumulativePsychology;
use super::strategy::StrategyResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Demo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub alias: Option<String>,
    pub archetype: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub start_ts: DateTime<Utc>,
    pub end_ts: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub cumulative_psychology: CumulativePsychology,
    /// 0..100
    pub psychology_confidence: u8,
    #[serde(default)]
    pub active_clarifying_questions: Vec<ClarifyingQuestion>,
    pub customer_archetype: Option<CustomerArchetype>,
    pub holistic_psychometric_profile: Option<HolisticProfile>,
    pub sales_indicators: Option<SalesIndicators>,
    pub psychology_updated_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(client_id: Option<Uuid>, status: SessionStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            start_ts: now,
            end_ts: None,
            status,
            cumulative_psychology: CumulativePsychology::default(),
            psychology_confidence: 0,
            active_clarifying_questions: Vec::new(),
            customer_archetype: None,
            holistic_psychometric_profile: None,
            sales_indicators: None,
            psychology_updated_at: None,
        }
    }

    /// Enforces the session-level invariant linking archetype presence to
    /// confidence, and the DNA/indicators co-presence invariant.
    pub fn is_internally_consistent(&self) -> bool {
        if self.customer_archetype.is_some() && self.psychology_confidence < 60 {
            return false;
        }
        self.holistic_psychometric_profile.is_some() == self.sales_indicators.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub suggestion_id: String,
    /// -1 or +1.
    pub score: i8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub session_id: Uuid,
    pub ts: DateTime<Utc>,
    pub user_input: String,
    pub ai_response: StrategyResponse,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
    pub parent_interaction_id: Option<Uuid>,
}

/// The full context an analysis pipeline turn operates over.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: Session,
    pub interactions: Vec<Interaction>,
    pub client: Option<Client>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_internally_consistent() {
        let s = Session::new(None, SessionStatus::Active);
        assert!(s.is_internally_consistent());
    }

    #[test]
    fn archetype_without_confidence_is_inconsistent() {
        let mut s = Session::new(None, SessionStatus::Active);
        s.customer_archetype = Some(CustomerArchetype {
            key: super::super::archetype::ArchetypeKey::PragmaticAnalyst,
            name: "Pragmatic Analyst".into(),
            description: String::new(),
            dominant_traits: vec![],
            confidence: 70,
            sales_strategy: super::super::archetype::SalesPlaybook {
                do_list: vec![],
                dont_list: vec![],
            },
            motivation: String::new(),
            communication_style: String::new(),
        });
        s.psychology_confidence = 40;
        assert!(!s.is_internally_consistent());
    }
}
