//! Process entry point: load configuration, construct the LLM gateway,
//! knowledge retriever and analysis-pipeline collaborators, and serve the
//! HTTP surface.

use std::sync::Arc;

use tesla_copilot_archetype::TeslaArchetypeService;
use tesla_copilot_config::{Settings, StoreBackend};
use tesla_copilot_core::{Retriever, SessionStore};
use tesla_copilot_llm::{LlmConfig, LlmGateway, OllamaBackend};
use tesla_copilot_pipeline::{DojoChannel, InMemorySessionStore, PipelineOrchestrator};
use tesla_copilot_psychology::PsychologyAnalyzer;
use tesla_copilot_rag::{Embedder, HashProjectionEmbedder, InMemoryKnowledgeRetriever, QdrantKnowledgeRetriever};
use tesla_copilot_server::{create_router, AppState};
use tesla_copilot_strategy::SalesStrategyGenerator;
use tesla_copilot_synthesis::{HolisticSynthesizer, SalesIndicatorGenerator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = Settings::load()?;
    let settings = Arc::new(settings);

    let llm_config = LlmConfig {
        model: settings.llm.model.clone(),
        endpoint: settings.llm.endpoint.clone(),
        api_key: settings.llm.api_key.clone(),
        timeout: settings.llm.timeout(),
        max_retries: settings.llm.max_retries,
        initial_backoff: settings.llm.initial_backoff(),
        ..Default::default()
    };
    let backend = Arc::new(OllamaBackend::new(llm_config)?);
    let gateway = Arc::new(LlmGateway::with_cache_settings(
        backend,
        settings.cache.ttl(),
        settings.cache.max_size,
    ));

    let embedder: Arc<dyn Embedder> = Arc::new(HashProjectionEmbedder::new(settings.rag.embedding_dim));
    let retriever: Arc<dyn Retriever> = match try_connect_qdrant(&settings, embedder.clone()).await {
        Some(qdrant) => qdrant,
        None => {
            tracing::warn!("qdrant unavailable, falling back to the in-memory knowledge retriever");
            Arc::new(InMemoryKnowledgeRetriever::new(embedder))
        }
    };

    let store: Arc<dyn SessionStore> = match settings.store.backend {
        StoreBackend::External => {
            tracing::warn!("external store backend configured but not implemented, using in-memory store");
            Arc::new(InMemorySessionStore::new())
        }
        StoreBackend::InMemory => Arc::new(InMemorySessionStore::new()),
    };

    let orchestrator = Arc::new(PipelineOrchestrator::new(
        store.clone(),
        Arc::new(PsychologyAnalyzer::new(gateway.clone())),
        Arc::new(TeslaArchetypeService::new()),
        Arc::new(HolisticSynthesizer::new(gateway.clone())),
        Arc::new(SalesIndicatorGenerator::new(gateway.clone())),
        Arc::new(SalesStrategyGenerator::new(gateway.clone(), Some(retriever.clone()))),
    ));
    let dojo = Arc::new(DojoChannel::new(gateway.clone(), retriever.clone()));

    let metrics = tesla_copilot_server::metrics::install_recorder();
    let state = AppState { orchestrator, dojo, retriever, store, config: settings.clone(), metrics };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind_addr).await?;
    tracing::info!(addr = %settings.server.bind_addr, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}

async fn try_connect_qdrant(
    settings: &Settings,
    embedder: Arc<dyn Embedder>,
) -> Option<Arc<dyn Retriever>> {
    let url = format!("http://{}:{}", settings.rag.qdrant_host, settings.rag.qdrant_port);
    QdrantKnowledgeRetriever::connect(&url, &settings.rag.collection_name, embedder)
        .await
        .map(|r| Arc::new(r) as Arc<dyn Retriever>)
        .map_err(|e| tracing::warn!(error = %e, "qdrant connection failed"))
        .ok()
}
