//! Holistic customer DNA synthesis (C6) and the sales indicators derived
//! from it (C7) — bundled in one crate since both share the DNA-keyed
//! cache pattern and, upstream, lived in a single synthesis service.

pub mod cache_key;
pub mod holistic;
pub mod indicators;

pub use holistic::{fallback_profile, HolisticSynthesizer};
pub use indicators::{fallback_indicators, SalesIndicatorGenerator};
