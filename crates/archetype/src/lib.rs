//! Deterministic customer archetype mapping for the Tesla sales vertical.
//!
//! Pure and synchronous: no I/O, no LLM call. A different vertical would
//! ship its own implementor of [`ArchetypeService`] with its own table and
//! composite formulas; only the trait boundary is shared.

use tesla_copilot_core::{
    ArchetypeKey, ArchetypeService, BigFiveTrait, CumulativePsychology, CustomerArchetype,
    DiscTrait, SalesPlaybook,
};

struct Scores {
    openness: u8,
    conscientiousness: u8,
    extraversion: u8,
    agreeableness: u8,
    dominance: u8,
    influence: u8,
    steadiness: u8,
    compliance: u8,
}

impl Scores {
    fn extract(profile: &CumulativePsychology) -> Self {
        Self {
            openness: profile.big_five.score_or_default(BigFiveTrait::Openness),
            conscientiousness: profile.big_five.score_or_default(BigFiveTrait::Conscientiousness),
            extraversion: profile.big_five.score_or_default(BigFiveTrait::Extraversion),
            agreeableness: profile.big_five.score_or_default(BigFiveTrait::Agreeableness),
            dominance: profile.disc.score_or_default(DiscTrait::Dominance),
            influence: profile.disc.score_or_default(DiscTrait::Influence),
            steadiness: profile.disc.score_or_default(DiscTrait::Steadiness),
            compliance: profile.disc.score_or_default(DiscTrait::Compliance),
        }
    }

    fn composite(&self, key: ArchetypeKey) -> f32 {
        match key {
            ArchetypeKey::StatusSeeker => {
                (self.extraversion as f32 + self.dominance as f32 + self.influence as f32) / 3.0
            }
            ArchetypeKey::FamilyGuardian => {
                (self.conscientiousness as f32 + self.steadiness as f32 + self.compliance as f32) / 3.0
            }
            ArchetypeKey::PragmaticAnalyst => (self.conscientiousness as f32 + self.compliance as f32) / 2.0,
            ArchetypeKey::FutureVisionary => (self.openness as f32 + self.influence as f32) / 2.0,
            ArchetypeKey::EcoActivist => (self.agreeableness as f32 + self.openness as f32) / 2.0,
            ArchetypeKey::FleetManager => (self.extraversion as f32 + self.compliance as f32) / 2.0,
        }
    }

    fn dominant_trait_scores(&self, key: ArchetypeKey) -> Vec<u8> {
        match key {
            ArchetypeKey::StatusSeeker => vec![self.extraversion, self.dominance, self.influence],
            ArchetypeKey::FamilyGuardian => vec![self.conscientiousness, self.steadiness, self.compliance],
            ArchetypeKey::PragmaticAnalyst => vec![self.conscientiousness, self.compliance],
            ArchetypeKey::FutureVisionary => vec![self.openness, self.influence],
            ArchetypeKey::EcoActivist => vec![self.agreeableness, self.openness],
            ArchetypeKey::FleetManager => vec![self.extraversion, self.compliance],
        }
    }

    fn triggers_fleet_manager_override(&self) -> bool {
        self.extraversion < 4 && self.compliance > 6
    }
}

/// Enumeration order used to break composite-score ties.
const RANKING_ORDER: [ArchetypeKey; 5] = [
    ArchetypeKey::StatusSeeker,
    ArchetypeKey::FamilyGuardian,
    ArchetypeKey::PragmaticAnalyst,
    ArchetypeKey::FutureVisionary,
    ArchetypeKey::EcoActivist,
];

pub struct TeslaArchetypeService;

impl TeslaArchetypeService {
    pub fn new() -> Self {
        Self
    }

    fn table_entry(&self, key: ArchetypeKey) -> (&'static str, &'static str, SalesPlaybook, &'static str, &'static str) {
        match key {
            ArchetypeKey::StatusSeeker => (
                "Status Seeker",
                "Views the car as a statement: performance numbers, exclusivity, and the latest tech matter more than running costs.",
                SalesPlaybook {
                    do_list: vec![
                        "Lead with acceleration figures and flagship trim options".to_string(),
                        "Emphasize exclusivity — limited colors, early access to new features".to_string(),
                        "Highlight how the car is perceived by others".to_string(),
                    ],
                    dont_list: vec![
                        "Don't open with total cost of ownership".to_string(),
                        "Don't dwell on practicality over prestige".to_string(),
                    ],
                },
                "Recognition and being first",
                "Confident, fast-paced, image-forward",
            ),
            ArchetypeKey::FamilyGuardian => (
                "Family Guardian",
                "Prioritizes safety ratings, cabin space, and long-term reliability for a growing family.",
                SalesPlaybook {
                    do_list: vec![
                        "Lead with crash-test ratings and active safety features".to_string(),
                        "Walk through cargo space and child-seat compatibility".to_string(),
                        "Reference long-term reliability data".to_string(),
                    ],
                    dont_list: vec![
                        "Don't lead with 0-60 times".to_string(),
                        "Don't rush the decision — this buyer researches thoroughly".to_string(),
                    ],
                },
                "Protecting the people who ride with them",
                "Warm, patient, detail-oriented",
            ),
            ArchetypeKey::PragmaticAnalyst => (
                "Pragmatic Analyst",
                "Compares spreadsheets before showrooms: cost per mile, maintenance history, resale value.",
                SalesPlaybook {
                    do_list: vec![
                        "Bring total-cost-of-ownership numbers over 5 years".to_string(),
                        "Offer to share maintenance and warranty documentation".to_string(),
                        "Answer technical questions precisely, with sources".to_string(),
                    ],
                    dont_list: vec![
                        "Don't use emotional or aspirational language as a substitute for data".to_string(),
                        "Don't gloss over a direct question".to_string(),
                    ],
                },
                "Making a provably correct decision",
                "Direct, data-driven, unhurried",
            ),
            ArchetypeKey::FutureVisionary => (
                "Future Visionary",
                "Drawn to the technology roadmap: autonomy, software updates, the company's broader mission.",
                SalesPlaybook {
                    do_list: vec![
                        "Discuss the over-the-air update roadmap and upcoming features".to_string(),
                        "Connect the purchase to the broader sustainable-energy mission".to_string(),
                        "Invite them to imagine what the car becomes over time".to_string(),
                    ],
                    dont_list: vec![
                        "Don't frame the car as a finished, static product".to_string(),
                    ],
                },
                "Being part of where the industry is going",
                "Enthusiastic, idea-forward, exploratory",
            ),
            ArchetypeKey::EcoActivist => (
                "Eco Activist",
                "Motivated primarily by environmental impact and reducing dependence on fossil fuels.",
                SalesPlaybook {
                    do_list: vec![
                        "Lead with emissions avoided and renewable-energy integration".to_string(),
                        "Mention solar/home-battery ecosystem options if relevant".to_string(),
                        "Validate the values driving the decision".to_string(),
                    ],
                    dont_list: vec![
                        "Don't lead with performance bragging rights".to_string(),
                    ],
                },
                "Reducing their environmental footprint",
                "Values-led, collaborative, sincere",
            ),
            ArchetypeKey::FleetManager => (
                "Fleet Manager",
                "Buys or recommends vehicles for an organization: uptime, per-unit cost, and standardization dominate.",
                SalesPlaybook {
                    do_list: vec![
                        "Lead with fleet pricing, uptime guarantees, and service-network coverage".to_string(),
                        "Offer a named account contact and volume terms".to_string(),
                        "Keep the conversation procedural and low-friction".to_string(),
                    ],
                    dont_list: vec![
                        "Don't pitch individual-buyer emotional benefits".to_string(),
                        "Don't let the conversation wander from operational terms".to_string(),
                    ],
                },
                "Predictable operating cost across the fleet",
                "Businesslike, terse, procedural",
            ),
        }
    }

    fn build(&self, key: ArchetypeKey, scores: &Scores) -> CustomerArchetype {
        let (name, description, playbook, motivation, communication_style) = self.table_entry(key);
        CustomerArchetype {
            key,
            name: name.to_string(),
            description: description.to_string(),
            dominant_traits: dominant_trait_names(key),
            confidence: self.calculate_confidence(&profile_from_scores(scores), key),
            sales_strategy: playbook,
            motivation: motivation.to_string(),
            communication_style: communication_style.to_string(),
        }
    }
}

impl Default for TeslaArchetypeService {
    fn default() -> Self {
        Self::new()
    }
}

fn dominant_trait_names(key: ArchetypeKey) -> Vec<String> {
    match key {
        ArchetypeKey::StatusSeeker => vec!["extraversion", "dominance", "influence"],
        ArchetypeKey::FamilyGuardian => vec!["conscientiousness", "steadiness", "compliance"],
        ArchetypeKey::PragmaticAnalyst => vec!["conscientiousness", "compliance"],
        ArchetypeKey::FutureVisionary => vec!["openness", "influence"],
        ArchetypeKey::EcoActivist => vec!["agreeableness", "openness"],
        ArchetypeKey::FleetManager => vec!["extraversion", "compliance"],
    }
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// `calculate_confidence` only needs the eight extracted scores, so tests
/// and internal callers can hand it a `Scores` without reconstructing a
/// full profile. Not exposed beyond this crate.
fn profile_from_scores(scores: &Scores) -> CumulativePsychology {
    use tesla_copilot_core::TraitScore;

    let mut profile = CumulativePsychology::default();
    let set_bf = |p: &mut CumulativePsychology, t: BigFiveTrait, v: u8| {
        p.big_five.set(t, TraitScore { score: v, rationale: String::new(), strategy: String::new() });
    };
    let set_disc = |p: &mut CumulativePsychology, t: DiscTrait, v: u8| {
        p.disc.set(t, TraitScore { score: v, rationale: String::new(), strategy: String::new() });
    };
    set_bf(&mut profile, BigFiveTrait::Openness, scores.openness);
    set_bf(&mut profile, BigFiveTrait::Conscientiousness, scores.conscientiousness);
    set_bf(&mut profile, BigFiveTrait::Extraversion, scores.extraversion);
    set_bf(&mut profile, BigFiveTrait::Agreeableness, scores.agreeableness);
    set_disc(&mut profile, DiscTrait::Dominance, scores.dominance);
    set_disc(&mut profile, DiscTrait::Influence, scores.influence);
    set_disc(&mut profile, DiscTrait::Steadiness, scores.steadiness);
    set_disc(&mut profile, DiscTrait::Compliance, scores.compliance);
    profile
}

impl ArchetypeService for TeslaArchetypeService {
    fn available_archetypes(&self) -> Vec<CustomerArchetype> {
        let neutral = Scores {
            openness: 5,
            conscientiousness: 5,
            extraversion: 5,
            agreeableness: 5,
            dominance: 5,
            influence: 5,
            steadiness: 5,
            compliance: 5,
        };
        RANKING_ORDER
            .iter()
            .chain(std::iter::once(&ArchetypeKey::FleetManager))
            .map(|k| self.build(*k, &neutral))
            .collect()
    }

    fn determine_archetype(&self, profile: &CumulativePsychology) -> CustomerArchetype {
        let scores = Scores::extract(profile);

        if scores.triggers_fleet_manager_override() {
            return self.build(ArchetypeKey::FleetManager, &scores);
        }

        let best = RANKING_ORDER
            .iter()
            .map(|k| (*k, scores.composite(*k)))
            .fold(None::<(ArchetypeKey, f32)>, |best, (k, c)| match best {
                Some((_, best_c)) if best_c >= c => best,
                _ => Some((k, c)),
            });

        match best {
            Some((key, composite)) if composite > 0.0 => self.build(key, &scores),
            _ => self.build(ArchetypeKey::PragmaticAnalyst, &scores),
        }
    }

    fn calculate_confidence(&self, profile: &CumulativePsychology, key: ArchetypeKey) -> u8 {
        let scores = Scores::extract(profile);
        let dominant = scores.dominant_trait_scores(key);
        let avg = dominant.iter().map(|s| *s as f32).sum::<f32>() / dominant.len() as f32;
        ((avg * 10.0).round() as i32).clamp(60, 95) as u8
    }

    fn fallback_archetype(&self) -> CustomerArchetype {
        let neutral = Scores {
            openness: 5,
            conscientiousness: 5,
            extraversion: 5,
            agreeableness: 5,
            dominance: 5,
            influence: 5,
            steadiness: 5,
            compliance: 5,
        };
        self.build(ArchetypeKey::PragmaticAnalyst, &neutral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tesla_copilot_core::TraitScore;

    fn profile_with(big_five: [(BigFiveTrait, u8); 5], disc: [(DiscTrait, u8); 4]) -> CumulativePsychology {
        let mut p = CumulativePsychology::default();
        for (t, v) in big_five {
            p.big_five.set(t, TraitScore { score: v, rationale: String::new(), strategy: String::new() });
        }
        for (t, v) in disc {
            p.disc.set(t, TraitScore { score: v, rationale: String::new(), strategy: String::new() });
        }
        p
    }

    #[test]
    fn fleet_manager_override_beats_every_composite() {
        let service = TeslaArchetypeService::new();
        let profile = profile_with(
            [
                (BigFiveTrait::Openness, 9),
                (BigFiveTrait::Conscientiousness, 2),
                (BigFiveTrait::Extraversion, 2),
                (BigFiveTrait::Agreeableness, 9),
                (BigFiveTrait::Neuroticism, 5),
            ],
            [
                (DiscTrait::Dominance, 2),
                (DiscTrait::Influence, 9),
                (DiscTrait::Steadiness, 5),
                (DiscTrait::Compliance, 9),
            ],
        );
        let archetype = service.determine_archetype(&profile);
        assert_eq!(archetype.key, ArchetypeKey::FleetManager);
    }

    #[test]
    fn status_seeker_wins_on_extraversion_dominance_influence() {
        let service = TeslaArchetypeService::new();
        let profile = profile_with(
            [
                (BigFiveTrait::Openness, 5),
                (BigFiveTrait::Conscientiousness, 3),
                (BigFiveTrait::Extraversion, 9),
                (BigFiveTrait::Agreeableness, 3),
                (BigFiveTrait::Neuroticism, 5),
            ],
            [
                (DiscTrait::Dominance, 9),
                (DiscTrait::Influence, 9),
                (DiscTrait::Steadiness, 3),
                (DiscTrait::Compliance, 3),
            ],
        );
        let archetype = service.determine_archetype(&profile);
        assert_eq!(archetype.key, ArchetypeKey::StatusSeeker);
        assert!(archetype.confidence >= 60 && archetype.confidence <= 95);
    }

    #[test]
    fn confidence_is_clamped_to_the_contracted_band() {
        let service = TeslaArchetypeService::new();
        let profile = profile_with(
            [
                (BigFiveTrait::Openness, 10),
                (BigFiveTrait::Conscientiousness, 10),
                (BigFiveTrait::Extraversion, 10),
                (BigFiveTrait::Agreeableness, 10),
                (BigFiveTrait::Neuroticism, 10),
            ],
            [
                (DiscTrait::Dominance, 10),
                (DiscTrait::Influence, 10),
                (DiscTrait::Steadiness, 10),
                (DiscTrait::Compliance, 10),
            ],
        );
        let confidence = service.calculate_confidence(&profile, ArchetypeKey::StatusSeeker);
        assert_eq!(confidence, 95);
    }

    #[test]
    fn fallback_archetype_is_pragmatic_analyst() {
        let service = TeslaArchetypeService::new();
        assert_eq!(service.fallback_archetype().key, ArchetypeKey::PragmaticAnalyst);
    }
}
