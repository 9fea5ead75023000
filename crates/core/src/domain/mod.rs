//! Domain entities shared across every pipeline stage.

pub mod archetype;
pub mod clarifying;
pub mod dojo;
pub mod holistic;
pub mod indicators;
pub mod knowledge;
pub mod psychology;
pub mod session;
pub mod strategy;

pub use archetype::{ArchetypeKey, CustomerArchetype, SalesPlaybook};
pub use clarifying::ClarifyingQuestion;
pub use dojo::{DojoResponseType, DojoTurn};
pub use holistic::{CommunicationStyle, HolisticProfile};
pub use indicators::{
    ChurnRisk, CustomerJourneyStage, JourneyStage, PurchaseTemperature, RiskLevel,
    SalesIndicators, SalesPotential, TemperatureLevel,
};
pub use knowledge::{KnowledgeNugget, KnowledgeType, ScoredNugget};
pub use psychology::{
    BigFive, BigFiveTrait, CumulativePsychology, Disc, DiscTrait, Observation, SchwartzValue,
    TraitScore,
};
pub use session::{Client, Feedback, Interaction, Session, SessionContext, SessionStatus};
pub use strategy::{
    ContextType, LikelyArchetype, ObjectionHandling, QuickResponse, StrategyResponse,
    SuggestedAction, SuggestedQuestion, UrgencyLevel,
};
