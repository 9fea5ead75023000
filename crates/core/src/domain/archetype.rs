//! Customer archetype — the domain-specific output of the archetype mapper.

use serde::{Deserialize, Serialize};

/// The six Tesla-specific customer archetypes. A different industry implementor
/// of `ArchetypeService` would define its own key set; this one is fixed for
/// the automotive domain this pipeline serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKey {
    StatusSeeker,
    FamilyGuardian,
    PragmaticAnalyst,
    FutureVisionary,
    EcoActivist,
    FleetManager,
}

impl ArchetypeKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchetypeKey::StatusSeeker => "status_seeker",
            ArchetypeKey::FamilyGuardian => "family_guardian",
            ArchetypeKey::PragmaticAnalyst => "pragmatic_analyst",
            ArchetypeKey::FutureVisionary => "future_visionary",
            ArchetypeKey::EcoActivist => "eco_activist",
            ArchetypeKey::FleetManager => "fleet_manager",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPlaybook {
    #[serde(rename = "do")]
    pub do_list: Vec<String>,
    #[serde(rename = "dont")]
    pub dont_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerArchetype {
    pub key: ArchetypeKey,
    pub name: String,
    pub description: String,
    pub dominant_traits: Vec<String>,
    /// Clamped to [60, 95] by construction.
    pub confidence: u8,
    pub sales_strategy: SalesPlaybook,
    pub motivation: String,
    pub communication_style: String,
}
