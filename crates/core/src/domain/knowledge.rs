//! Vector-indexed domain knowledge fed into the RAG step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeType {
    General,
    Objection,
    Closing,
    Product,
    Pricing,
    Competition,
    Demo,
    FollowUp,
    Technical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNugget {
    pub id: String,
    pub content: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: KnowledgeType,
    pub archetype: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    /// 384-dim, unit-normalized, cosine distance.
    #[serde(default)]
    pub embedding_vector: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNugget {
    pub nugget: KnowledgeNugget,
    pub similarity_score: f32,
}
