//! Types for the expert-in-the-loop knowledge training channel.

use serde::{Deserialize, Serialize};

use super::knowledge::KnowledgeNugget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DojoResponseType {
    Question,
    Confirmation,
    Status,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DojoTurn {
    pub dojo_session_id: String,
    pub response_text: String,
    pub response_type: DojoResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_nugget: Option<KnowledgeNugget>,
    /// 0..100
    pub confidence_level: u8,
}
