//! The application's shared, constructor-injected collaborators. Built once
//! at process start in `main`, then cloned (cheaply — every field is an
//! `Arc`) into every request.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tesla_copilot_config::Settings;
use tesla_copilot_core::{Retriever, SessionStore};
use tesla_copilot_pipeline::{DojoChannel, PipelineOrchestrator};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<PipelineOrchestrator>,
    pub dojo: Arc<DojoChannel>,
    pub retriever: Arc<dyn Retriever>,
    pub store: Arc<dyn SessionStore>,
    pub config: Arc<Settings>,
    pub metrics: PrometheusHandle,
}
