use std::env;

use serde::{Deserialize, Serialize};

/// Load a `.env` file into the process environment. A missing file is fine.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f32(key: &str, default: f32) -> f32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Read every section from environment variables; `load_dotenv()` should
    /// run first so a `.env` file is visible here. API credentials are
    /// deliberately not part of the config: they travel per call and are
    /// never held beyond it.
    pub fn from_env() -> Self {
        Self {
            chunking: ChunkingConfig::from_env(),
            embedding: EmbeddingConfig::from_env(),
            retrieval: RetrievalConfig::from_env(),
            llm: LlmConfig::from_env(),
            ollama: OllamaConfig::from_env(),
            http: HttpConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs. No credential material
    /// ever appears here.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  chunking:   size={}, overlap={}",
            self.chunking.chunk_size,
            self.chunking.chunk_overlap
        );
        tracing::info!(
            "  embedding:  provider={}, model={}, dims={}, batch={}",
            self.embedding.provider,
            self.embedding.model,
            self.embedding.dimensions,
            self.embedding.batch_size
        );
        tracing::info!("  retrieval:  top_k={}", self.retrieval.top_k);
        tracing::info!(
            "  llm:        provider={}, model={}, temperature={}",
            self.llm.provider,
            self.llm.model,
            self.llm.temperature
        );
        tracing::info!("  ollama:     url={}", self.ollama.url);
        tracing::info!(
            "  http:       fetch_timeout={}s, api_timeout={}s",
            self.http.fetch_timeout_secs,
            self.http.api_timeout_secs
        );
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks of one document.
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    fn from_env() -> Self {
        Self {
            chunk_size: env_usize("CHUNK_SIZE", 1000),
            chunk_overlap: env_usize("CHUNK_OVERLAP", 200),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 200 }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "gemini" or "ollama"
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub batch_size: usize,
}

impl EmbeddingConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("EMBEDDING_PROVIDER", "gemini"),
            model: env_or("EMBEDDING_MODEL", "embedding-001"),
            dimensions: env_usize("EMBEDDING_DIMENSIONS", 768),
            batch_size: env_usize("EMBEDDING_BATCH_SIZE", 64),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "embedding-001".to_string(),
            dimensions: 768,
            batch_size: 64,
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the answerer per question.
    pub top_k: usize,
}

impl RetrievalConfig {
    fn from_env() -> Self {
        Self { top_k: env_usize("TOP_K", 3) }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

// ── LLM (answer generation) ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini" or "ollama"
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("LLM_PROVIDER", "gemini"),
            model: env_or("LLM_MODEL", "gemini-1.5-pro"),
            temperature: env_f32("LLM_TEMPERATURE", 0.5),
            max_tokens: env_u32("LLM_MAX_TOKENS", 2048),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.provider.as_str(), "gemini" | "ollama")
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-1.5-pro".to_string(),
            temperature: 0.5,
            max_tokens: 2048,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_env() -> Self {
        Self {
            url: env_or("OLLAMA_URL", "http://localhost:11434"),
            model: env_or("OLLAMA_MODEL", "llama3.2"),
            embedding_model: env_or("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
        }
    }
}

// ── HTTP timeouts ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for fetching a user-supplied URL.
    pub fetch_timeout_secs: u64,
    /// Timeout for embedding and generation API calls.
    pub api_timeout_secs: u64,
}

impl HttpConfig {
    fn from_env() -> Self {
        Self {
            fetch_timeout_secs: env_u64("FETCH_TIMEOUT_SECS", 30),
            api_timeout_secs: env_u64("API_TIMEOUT_SECS", 120),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { fetch_timeout_secs: 30, api_timeout_secs: 120 }
    }
}
