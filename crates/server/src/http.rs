//! Route table and handlers. Handlers validate request shape and map
//! outcomes to status codes (§7); all business logic lives in the
//! components the router's `AppState` wires together.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use tesla_copilot_core::{
    Feedback, KnowledgeNugget, KnowledgeType, Retriever, SearchFilter, SessionStatus, SessionStore,
};

use crate::state::AppState;
use crate::ServerError;

const MAX_BULK_KNOWLEDGE_ITEMS: usize = 50;

pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/clients", post(create_client).get(list_clients))
        .route("/clients/:id", get(get_client))
        .route(
            "/clients/:id/sessions",
            post(create_session).get(list_client_sessions),
        )
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/end", post(end_session))
        .route(
            "/sessions/:id/interactions",
            post(create_interaction).get(list_interactions),
        )
        .route("/sessions/:id/interactions/stream", post(crate::sse::stream_interaction))
        .route("/interactions/:id/feedback", post(record_feedback))
        .route("/knowledge", post(create_knowledge).get(list_knowledge))
        .route("/knowledge/bulk", post(bulk_knowledge))
        .route("/knowledge/search", post(search_knowledge))
        .route("/knowledge/:id", delete(delete_knowledge))
        .route("/knowledge/health/qdrant", get(knowledge_health))
        .route("/dojo/chat", post(dojo_chat))
        .route("/dojo/confirm", post(dojo_confirm))
        .route("/health", get(health))
        .route("/health/db", get(health_db))
        .route("/metrics", get(crate::metrics::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .with_state(state)
}

/// Falls back to `localhost:3000` when no origins are configured or none
/// parse, so a zero-configuration boot is never wide open.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        tracing::info!("no cors origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin, "invalid cors origin, skipping");
                None
            })
        })
        .collect();

    if parsed.is_empty() {
        tracing::error!("all configured cors origins are invalid, falling back to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(true)
}

// ---- clients --------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CreateClientRequest {
    alias: Option<String>,
    archetype: Option<String>,
    notes: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

async fn create_client(
    State(state): State<AppState>,
    Json(req): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let client = state
        .store
        .create_client(req.alias, req.archetype, req.notes, req.tags)
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    skip: Option<usize>,
    limit: Option<usize>,
}

async fn list_clients(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let clients = state
        .store
        .list_clients(q.skip.unwrap_or(0), q.limit.unwrap_or(20))
        .await?;
    Ok(Json(clients))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    Ok(Json(state.store.get_client(id).await?))
}

// ---- sessions ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    session_type: Option<String>,
    #[allow(dead_code)]
    notes: Option<String>,
}

async fn create_session(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let status = match req.session_type.as_deref() {
        Some("demo") => SessionStatus::Demo,
        _ => SessionStatus::Active,
    };
    let session = state.store.create_session(client_id, status).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[derive(Debug, Deserialize)]
struct ListSessionsQuery {
    page: Option<usize>,
    page_size: Option<usize>,
    only_active: Option<bool>,
    session_type: Option<String>,
}

async fn list_client_sessions(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Query(q): Query<ListSessionsQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let mut sessions = state
        .store
        .list_sessions(client_id, q.page.unwrap_or(0), q.page_size.unwrap_or(20))
        .await?;

    if q.only_active.unwrap_or(false) {
        sessions.retain(|s| s.status == SessionStatus::Active);
    }
    if let Some(requested) = &q.session_type {
        sessions.retain(|s| format!("{:?}", s.status).to_lowercase() == *requested);
    }
    Ok(Json(sessions))
}

#[derive(Debug, Deserialize)]
struct GetSessionQuery {
    include_client: Option<bool>,
    include_interactions: Option<bool>,
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<GetSessionQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let ctx = state.store.get_session_context(id).await?;
    let mut body = serde_json::to_value(&ctx.session).map_err(|e| ServerError::Internal(e.to_string()))?;
    if q.include_client.unwrap_or(false) {
        body["client"] = serde_json::to_value(&ctx.client).unwrap_or(json!(null));
    }
    if q.include_interactions.unwrap_or(false) {
        body["interactions"] = serde_json::to_value(&ctx.interactions).unwrap_or(json!([]));
    }
    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
struct EndSessionRequest {
    #[allow(dead_code)]
    summary: Option<String>,
    #[allow(dead_code)]
    outcome: Option<String>,
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(_req): Json<EndSessionRequest>,
) -> Result<impl IntoResponse, ServerError> {
    Ok(Json(state.store.end_session(id).await?))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.store.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- interactions -----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ClarifyingAnswerBody {
    question_id: String,
    answer: String,
}

#[derive(Debug, Deserialize)]
struct CreateInteractionRequest {
    user_input: String,
    #[serde(default)]
    #[allow(dead_code)]
    interaction_type: Option<String>,
    parent_interaction_id: Option<Uuid>,
    clarifying_answer: Option<ClarifyingAnswerBody>,
    #[allow(dead_code)]
    additional_context: Option<String>,
}

async fn create_interaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateInteractionRequest>,
) -> Result<impl IntoResponse, ServerError> {
    if req.user_input.trim().is_empty() && req.clarifying_answer.is_none() {
        return Err(ServerError::Validation("user_input must not be empty".to_string()));
    }

    let timer = crate::metrics::Timer::start();
    let interaction = if let Some(answer) = req.clarifying_answer {
        state
            .orchestrator
            .answer_clarifying_question(id, &answer.question_id, &answer.answer)
            .await?
    } else {
        state
            .orchestrator
            .process_observation(id, &req.user_input, req.parent_interaction_id)
            .await?
    };
    crate::metrics::record_turn(timer.elapsed(), interaction.ai_response.is_fallback);
    Ok((StatusCode::CREATED, Json(interaction)))
}

#[derive(Debug, Deserialize)]
struct PageSizeQuery {
    page: Option<usize>,
    page_size: Option<usize>,
}

async fn list_interactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<PageSizeQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let interactions = state
        .store
        .list_interactions(id, q.page.unwrap_or(0), q.page_size.unwrap_or(20))
        .await?;
    Ok(Json(interactions))
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    suggestion_id: String,
    #[allow(dead_code)]
    suggestion_type: Option<String>,
    score: i8,
}

async fn record_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FeedbackRequest>,
) -> Result<impl IntoResponse, ServerError> {
    if req.score != 1 && req.score != -1 {
        return Err(ServerError::Validation("score must be +1 or -1".to_string()));
    }
    state.store.record_feedback(id, &req.suggestion_id, req.score).await?;
    Ok(Json(Feedback { suggestion_id: req.suggestion_id, score: req.score }))
}

// ---- knowledge ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NuggetInput {
    content: String,
    title: String,
    #[serde(rename = "type")]
    kind: KnowledgeType,
    archetype: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default = "default_source")]
    source: String,
}

fn default_source() -> String {
    "api".to_string()
}

impl NuggetInput {
    fn into_nugget(self) -> KnowledgeNugget {
        KnowledgeNugget {
            id: String::new(),
            content: self.content,
            title: self.title,
            kind: self.kind,
            archetype: self.archetype,
            tags: self.tags,
            source: self.source,
            created_at: chrono::Utc::now(),
            embedding_vector: Vec::new(),
        }
    }
}

async fn create_knowledge(
    State(state): State<AppState>,
    Json(req): Json<NuggetInput>,
) -> Result<impl IntoResponse, ServerError> {
    let mut ids = state.retriever.bulk_upsert(vec![req.into_nugget()]).await?;
    let id = ids.pop().ok_or_else(|| ServerError::Internal("upsert produced no id".to_string()))?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

#[derive(Debug, Deserialize)]
struct BulkKnowledgeRequest {
    items: Vec<NuggetInput>,
}

async fn bulk_knowledge(
    State(state): State<AppState>,
    Json(req): Json<BulkKnowledgeRequest>,
) -> Result<impl IntoResponse, ServerError> {
    if req.items.len() > MAX_BULK_KNOWLEDGE_ITEMS {
        return Err(ServerError::Semantic(format!(
            "bulk upload capped at {MAX_BULK_KNOWLEDGE_ITEMS} items, got {}",
            req.items.len()
        )));
    }

    let nuggets: Vec<KnowledgeNugget> = req.items.into_iter().map(NuggetInput::into_nugget).collect();
    let total = nuggets.len();
    match state.retriever.bulk_upsert(nuggets).await {
        Ok(ids) => Ok(Json(json!({
            "success_count": ids.len(),
            "error_count": total - ids.len(),
            "created_ids": ids,
            "errors": Vec::<String>::new(),
        }))),
        Err(e) => Ok(Json(json!({
            "success_count": 0,
            "error_count": total,
            "created_ids": Vec::<String>::new(),
            "errors": vec![e.to_string()],
        }))),
    }
}

#[derive(Debug, Deserialize)]
struct ListKnowledgeQuery {
    page: Option<usize>,
    size: Option<usize>,
    knowledge_type: Option<KnowledgeType>,
    archetype: Option<String>,
    search: Option<String>,
}

async fn list_knowledge(
    State(state): State<AppState>,
    Query(q): Query<ListKnowledgeQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let page = q.page.unwrap_or(0);
    let size = q.size.unwrap_or(20);

    let mut nuggets = state.retriever.get_all(10_000).await?;
    if let Some(kind) = q.knowledge_type {
        nuggets.retain(|n| n.kind == kind);
    }
    if let Some(archetype) = &q.archetype {
        nuggets.retain(|n| n.archetype.as_deref() == Some(archetype.as_str()));
    }
    if let Some(search) = &q.search {
        let needle = search.to_lowercase();
        nuggets.retain(|n| n.content.to_lowercase().contains(&needle) || n.title.to_lowercase().contains(&needle));
    }

    let page_items: Vec<_> = nuggets.into_iter().skip(page * size).take(size).collect();
    Ok(Json(page_items))
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default = "default_search_limit")]
    limit: usize,
    knowledge_type: Option<KnowledgeType>,
    archetype: Option<String>,
}

fn default_search_limit() -> usize {
    3
}

async fn search_knowledge(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let filter = SearchFilter { archetype: req.archetype, kind: req.knowledge_type };
    let results = state.retriever.search(&req.query, &filter, req.limit).await?;
    Ok(Json(results))
}

async fn delete_knowledge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.retriever.delete(&id).await?;
    Ok(Json(json!({ "deleted": true, "id": id })))
}

async fn knowledge_health(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    Ok(Json(state.retriever.health().await?))
}

// ---- dojo ---------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DojoChatRequest {
    #[serde(default)]
    session_id: Option<String>,
    message: String,
    #[serde(default = "default_training_mode")]
    training_mode: String,
    client_context: Option<String>,
}

fn default_training_mode() -> String {
    "general".to_string()
}

#[derive(Debug, Serialize)]
struct DojoChatResponse {
    dojo_session_id: String,
    response: String,
    response_type: String,
    structured_data: Option<serde_json::Value>,
    confidence_level: u8,
}

async fn dojo_chat(
    State(state): State<AppState>,
    Json(req): Json<DojoChatRequest>,
) -> Result<impl IntoResponse, ServerError> {
    if req.message.trim().is_empty() {
        return Err(ServerError::Validation("message must not be empty".to_string()));
    }
    let turn = state
        .dojo
        .chat(req.session_id, &req.message, &req.training_mode, req.client_context.as_deref())
        .await;

    let response_type = match turn.response_type {
        tesla_copilot_core::DojoResponseType::Question => "question",
        tesla_copilot_core::DojoResponseType::Confirmation => "confirmation",
        tesla_copilot_core::DojoResponseType::Status => "status",
        tesla_copilot_core::DojoResponseType::Error => "error",
    };

    Ok(Json(DojoChatResponse {
        dojo_session_id: turn.dojo_session_id,
        response: turn.response_text,
        response_type: response_type.to_string(),
        structured_data: turn.proposed_nugget.map(|n| serde_json::to_value(n).unwrap_or(json!(null))),
        confidence_level: turn.confidence_level,
    }))
}

#[derive(Debug, Deserialize)]
struct DojoConfirmRequest {
    session_id: String,
    #[serde(default)]
    #[allow(dead_code)]
    structured_data: Option<serde_json::Value>,
    confirmed: bool,
}

async fn dojo_confirm(
    State(state): State<AppState>,
    Json(req): Json<DojoConfirmRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let nugget_id = state.dojo.confirm(&req.session_id, req.confirmed).await?;
    Ok(Json(json!({ "confirmed": req.confirmed, "nugget_id": nugget_id })))
}

// ---- health ---------------------------------------------------------------------

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn health_db(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list_clients(0, 1).await {
        Ok(_) => Json(json!({ "status": "ok" })),
        Err(e) => Json(json!({ "status": "error", "detail": e.to_string() })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_falls_back_to_localhost_when_unconfigured() {
        let _ = build_cors_layer(&[]);
    }

    #[test]
    fn cors_falls_back_when_every_origin_is_invalid() {
        let _ = build_cors_layer(&["not a valid header value \u{0}".to_string()]);
    }
}
