//! C8: RAG-augmented sales strategy generation, with brand-loyalty and
//! archetype-sovereignty rules baked into the prompt rather than left to
//! the model's discretion.

pub mod confidence;
pub mod fallback;
pub mod generator;
pub mod parse;
pub mod prompt;

pub use fallback::fallback_response;
pub use generator::SalesStrategyGenerator;
