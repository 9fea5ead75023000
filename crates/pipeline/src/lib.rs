//! C9 orchestration, the C3 in-memory session store, and the C10 dojo
//! training channel — the services that turn C1-C8 into an exercisable
//! pipeline.

pub mod dojo;
pub mod orchestrator;
pub mod store;

pub use dojo::DojoChannel;
pub use orchestrator::PipelineOrchestrator;
pub use store::InMemorySessionStore;
