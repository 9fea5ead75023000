//! The streaming interaction endpoint. Per the design notes this does not
//! stream tokens directly from the LLM: it runs the full turn first, then
//! paces `quick_response.text` out word by word so a client gets an
//! early, readable trickle before the terminal `stream_end` event.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::Stream;
use serde::Deserialize;
use uuid::Uuid;

use crate::state::AppState;

const TOKEN_PACING: Duration = Duration::from_millis(120);

#[derive(Debug, Deserialize)]
pub struct StreamInteractionRequest {
    user_input: String,
    #[serde(default)]
    #[allow(dead_code)]
    session_history: Option<Vec<String>>,
}

pub async fn stream_interaction(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<StreamInteractionRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let timer = crate::metrics::Timer::start();
    let outcome = if req.user_input.trim().is_empty() {
        Err("user_input must not be empty".to_string())
    } else {
        state
            .orchestrator
            .process_observation(session_id, &req.user_input, None)
            .await
            .map_err(|e| e.to_string())
    };
    if let Ok(interaction) = &outcome {
        crate::metrics::record_turn(timer.elapsed(), interaction.ai_response.is_fallback);
    }

    let stream = async_stream::stream! {
        match outcome {
            Ok(interaction) => {
                for word in interaction.ai_response.quick_response.text.split_whitespace() {
                    yield Ok(Event::default().event("token").data(word));
                    tokio::time::sleep(TOKEN_PACING).await;
                }
                let payload = serde_json::to_string(&interaction.ai_response).unwrap_or_default();
                yield Ok(Event::default().event("stream_end").data(payload));
            }
            Err(message) => {
                yield Ok(Event::default().event("error").data(message));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
