//! The archetype mapper's capability set, kept industry-pluggable per the
//! archetype polymorphism design note: a different vertical substitutes the
//! archetype table and composite formulas without touching this trait.

use crate::{CumulativePsychology, CustomerArchetype};

pub trait ArchetypeService: Send + Sync {
    fn available_archetypes(&self) -> Vec<CustomerArchetype>;

    fn determine_archetype(&self, profile: &CumulativePsychology) -> CustomerArchetype;

    fn calculate_confidence(&self, profile: &CumulativePsychology, key: crate::ArchetypeKey) -> u8;

    fn fallback_archetype(&self) -> CustomerArchetype;
}
