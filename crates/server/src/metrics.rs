//! Pipeline-stage latency and fallback-activation counters, exposed at
//! `/metrics` as a sibling to `/health`.

use std::time::{Duration, Instant};

use axum::extract::State;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;

pub fn install_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install the prometheus recorder")
}

pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}

pub struct Timer(Instant);

impl Timer {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

pub fn record_turn(duration: Duration, is_fallback: bool) {
    metrics::histogram!("pipeline_turn_duration_seconds").record(duration.as_secs_f64());
    if is_fallback {
        metrics::counter!("fallback_activations_total").increment(1);
    }
}
