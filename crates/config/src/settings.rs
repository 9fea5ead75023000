use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_ollama_model() -> String {
    "qwen2.5:7b-instruct-q4_K_M".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_retries() -> u32 {
    3
}
fn default_initial_backoff_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_ollama_model")]
    pub model: String,
    #[serde(default)]
    pub fallback_model: Option<String>,
    #[serde(default = "default_ollama_url")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default)]
    pub max_tokens_per_request: Option<u32>,
    #[serde(default)]
    pub max_context_length: Option<u32>,
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_ollama_model(),
            fallback_model: None,
            endpoint: default_ollama_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_tokens_per_request: None,
            max_context_length: None,
        }
    }
}

fn default_qdrant_host() -> String {
    "localhost".to_string()
}
fn default_qdrant_port() -> u16 {
    6334
}
fn default_collection_name() -> String {
    "tesla_knowledge".to_string()
}
fn default_embedding_dim() -> usize {
    384
}
fn default_top_k() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagSettings {
    #[serde(default = "default_qdrant_host")]
    pub qdrant_host: String,
    #[serde(default = "default_qdrant_port")]
    pub qdrant_port: u16,
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            qdrant_host: default_qdrant_host(),
            qdrant_port: default_qdrant_port(),
            collection_name: default_collection_name(),
            embedding_dim: default_embedding_dim(),
            default_top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    InMemory,
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_backend")]
    pub backend: StoreBackend,
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::InMemory
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            database_url: None,
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_rate_limit_requests() -> u32 {
    60
}
fn default_rate_limit_period_secs() -> u64 {
    60
}
fn default_ws_heartbeat_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub jwt_secret_key: Option<String>,
    #[serde(default = "default_ws_heartbeat_secs")]
    pub ws_heartbeat_secs: u64,
    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: u32,
    #[serde(default = "default_rate_limit_period_secs")]
    pub rate_limit_period_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_origins: Vec::new(),
            secret_key: None,
            jwt_secret_key: None,
            ws_heartbeat_secs: default_ws_heartbeat_secs(),
            rate_limit_requests: default_rate_limit_requests(),
            rate_limit_period_secs: default_rate_limit_period_secs(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    3600
}
fn default_cache_max_size() -> usize {
    128
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_size: default_cache_max_size(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub rag: RagSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

impl Settings {
    /// Loads defaults, optionally overlays `config.toml` in the working
    /// directory if present, then applies the recognized environment
    /// variables (see SPEC_FULL.md §6) on top.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = config::Config::builder().add_source(
            config::File::with_name("config").required(false),
        );
        let raw = builder.build()?;
        let mut settings: Settings = raw.try_deserialize().unwrap_or_default();
        settings.apply_env_overrides();
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) {
        use std::env::var;

        if let Ok(v) = var("OLLAMA_API_URL") {
            self.llm.endpoint = v;
        }
        if let Ok(v) = var("OLLAMA_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = var("OLLAMA_FALLBACK_MODEL") {
            self.llm.fallback_model = Some(v);
        }
        if let Ok(v) = var("OLLAMA_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Ok(v) = var("MAX_TOKENS_PER_REQUEST") {
            self.llm.max_tokens_per_request = v.parse().ok();
        }
        if let Ok(v) = var("MAX_CONTEXT_LENGTH") {
            self.llm.max_context_length = v.parse().ok();
        }
        if let Ok(v) = var("QDRANT_HOST") {
            self.rag.qdrant_host = v;
        }
        if let Ok(v) = var("QDRANT_PORT") {
            if let Ok(port) = v.parse() {
                self.rag.qdrant_port = port;
            }
        }
        if let Ok(v) = var("QDRANT_COLLECTION_NAME") {
            self.rag.collection_name = v;
        }
        if let Ok(v) = var("DATABASE_URL") {
            self.store.database_url = Some(v);
            self.store.backend = StoreBackend::External;
        }
        if let Ok(v) = var("CORS_ORIGINS_STR") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = var("SECRET_KEY") {
            self.server.secret_key = Some(v);
        }
        if let Ok(v) = var("JWT_SECRET_KEY") {
            self.server.jwt_secret_key = Some(v);
        }
        if let Ok(v) = var("WS_HEARTBEAT_INTERVAL") {
            if let Ok(secs) = v.parse() {
                self.server.ws_heartbeat_secs = secs;
            }
        }
        if let Ok(v) = var("RATE_LIMIT_REQUESTS") {
            if let Ok(n) = v.parse() {
                self.server.rate_limit_requests = n;
            }
        }
        if let Ok(v) = var("RATE_LIMIT_PERIOD") {
            if let Ok(secs) = v.parse() {
                self.server.rate_limit_period_secs = secs;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_without_any_configuration() {
        let settings = Settings::default();
        assert_eq!(settings.llm.max_retries, 3);
        assert_eq!(settings.cache.ttl_secs, 3600);
        assert_eq!(settings.cache.max_size, 128);
        assert_eq!(settings.rag.embedding_dim, 384);
    }

    #[test]
    fn env_override_replaces_ollama_model() {
        std::env::set_var("OLLAMA_MODEL", "llama3:70b");
        let mut settings = Settings::default();
        settings.apply_env_overrides();
        assert_eq!(settings.llm.model, "llama3:70b");
        std::env::remove_var("OLLAMA_MODEL");
    }
}
