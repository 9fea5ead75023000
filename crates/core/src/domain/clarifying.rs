//! A/B-framed clarifying questions shown to the seller to gather more evidence.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    pub id: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub psychological_target: String,
}
