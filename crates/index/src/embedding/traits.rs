use async_trait::async_trait;
use thiserror::Error;

/// Failures shared by every embedding backend. Mirrors the generation
/// error taxonomy so hosts handle both sides of the model API alike.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Embedding backends (Gemini, Ollama, test fakes).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed each text, returning one vector per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Width of the vectors this backend produces.
    fn dimensions(&self) -> usize;
}
