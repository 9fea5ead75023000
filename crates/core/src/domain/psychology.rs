//! The cumulative psychometric profile built up across a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single scored trait: every Big Five and DISC dimension shares this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitScore {
    /// 0..10, never null once a profile leaves the analyzer (Zero-Null Policy).
    pub score: u8,
    pub rationale: String,
    pub strategy: String,
}

impl TraitScore {
    pub fn imputed(trait_name: &str) -> Self {
        Self {
            score: 5,
            rationale: format!("imputed — insufficient evidence for {trait_name}"),
            strategy: format!("observe behaviors related to {trait_name} in the next turn"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigFiveTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl BigFiveTrait {
    pub const ALL: [BigFiveTrait; 5] = [
        BigFiveTrait::Openness,
        BigFiveTrait::Conscientiousness,
        BigFiveTrait::Extraversion,
        BigFiveTrait::Agreeableness,
        BigFiveTrait::Neuroticism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BigFiveTrait::Openness => "openness",
            BigFiveTrait::Conscientiousness => "conscientiousness",
            BigFiveTrait::Extraversion => "extraversion",
            BigFiveTrait::Agreeableness => "agreeableness",
            BigFiveTrait::Neuroticism => "neuroticism",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscTrait {
    Dominance,
    Influence,
    Steadiness,
    Compliance,
}

impl DiscTrait {
    pub const ALL: [DiscTrait; 4] = [
        DiscTrait::Dominance,
        DiscTrait::Influence,
        DiscTrait::Steadiness,
        DiscTrait::Compliance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscTrait::Dominance => "dominance",
            DiscTrait::Influence => "influence",
            DiscTrait::Steadiness => "steadiness",
            DiscTrait::Compliance => "compliance",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BigFive {
    pub openness: Option<TraitScore>,
    pub conscientiousness: Option<TraitScore>,
    pub extraversion: Option<TraitScore>,
    pub agreeableness: Option<TraitScore>,
    pub neuroticism: Option<TraitScore>,
}

impl BigFive {
    pub fn get(&self, t: BigFiveTrait) -> Option<&TraitScore> {
        match t {
            BigFiveTrait::Openness => self.openness.as_ref(),
            BigFiveTrait::Conscientiousness => self.conscientiousness.as_ref(),
            BigFiveTrait::Extraversion => self.extraversion.as_ref(),
            BigFiveTrait::Agreeableness => self.agreeableness.as_ref(),
            BigFiveTrait::Neuroticism => self.neuroticism.as_ref(),
        }
    }

    pub fn set(&mut self, t: BigFiveTrait, v: TraitScore) {
        match t {
            BigFiveTrait::Openness => self.openness = Some(v),
            BigFiveTrait::Conscientiousness => self.conscientiousness = Some(v),
            BigFiveTrait::Extraversion => self.extraversion = Some(v),
            BigFiveTrait::Agreeableness => self.agreeableness = Some(v),
            BigFiveTrait::Neuroticism => self.neuroticism = Some(v),
        }
    }

    pub fn score_or_default(&self, t: BigFiveTrait) -> u8 {
        self.get(t).map(|s| s.score).unwrap_or(5)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub dominance: Option<TraitScore>,
    pub influence: Option<TraitScore>,
    pub steadiness: Option<TraitScore>,
    pub compliance: Option<TraitScore>,
}

impl Disc {
    pub fn get(&self, t: DiscTrait) -> Option<&TraitScore> {
        match t {
            DiscTrait::Dominance => self.dominance.as_ref(),
            DiscTrait::Influence => self.influence.as_ref(),
            DiscTrait::Steadiness => self.steadiness.as_ref(),
            DiscTrait::Compliance => self.compliance.as_ref(),
        }
    }

    pub fn set(&mut self, t: DiscTrait, v: TraitScore) {
        match t {
            DiscTrait::Dominance => self.dominance = Some(v),
            DiscTrait::Influence => self.influence = Some(v),
            DiscTrait::Steadiness => self.steadiness = Some(v),
            DiscTrait::Compliance => self.compliance = Some(v),
        }
    }

    pub fn score_or_default(&self, t: DiscTrait) -> u8 {
        self.get(t).map(|s| s.score).unwrap_or(5)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchwartzValue {
    pub name: String,
    /// 0..10
    pub strength: u8,
    pub rationale: String,
    pub strategy: String,
    pub present: bool,
}

impl SchwartzValue {
    pub fn default_security() -> Self {
        Self {
            name: "security".to_string(),
            strength: 5,
            rationale: "imputed — no value signals observed yet".to_string(),
            strategy: "probe for safety and stability concerns".to_string(),
            present: false,
        }
    }
}

/// One answered clarifying question, recorded against the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub question: String,
    pub answer: String,
    pub ts: DateTime<Utc>,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativePsychology {
    pub big_five: BigFive,
    pub disc: Disc,
    #[serde(default)]
    pub schwartz_values: Vec<SchwartzValue>,
    #[serde(default)]
    pub observations: Vec<Observation>,
    #[serde(default)]
    pub observations_summary: String,
}

impl CumulativePsychology {
    /// True once every Big Five trait carries a positive score — the precondition
    /// the holistic synthesizer checks before it will call the LLM at all.
    pub fn big_five_complete(&self) -> bool {
        BigFiveTrait::ALL
            .iter()
            .all(|t| self.big_five.get(*t).is_some_and(|s| s.score > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imputed_trait_has_neutral_score() {
        let t = TraitScore::imputed("openness");
        assert_eq!(t.score, 5);
        assert!(t.rationale.contains("openness"));
    }

    #[test]
    fn big_five_complete_requires_all_five_positive() {
        let mut p = CumulativePsychology::default();
        assert!(!p.big_five_complete());
        for t in BigFiveTrait::ALL {
            p.big_five.set(t, TraitScore::imputed(t.as_str()));
        }
        assert!(p.big_five_complete());
    }
}
