mod gemini;
mod ollama;
mod traits;

use std::sync::Arc;
use std::time::Duration;

use docsage_core::Config;

pub use gemini::GeminiEmbedder;
pub use ollama::OllamaEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Build the configured embedding backend. The credential is consumed here
/// and lives only inside the returned embedder.
pub fn create_embedder(
    config: &Config,
    credential: &str,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let timeout = Duration::from_secs(config.http.api_timeout_secs);

    match config.embedding.provider.as_str() {
        "gemini" => {
            if credential.trim().is_empty() {
                return Err(EmbeddingError::NotConfigured(
                    "gemini embeddings require an API key".to_string(),
                ));
            }
            Ok(Arc::new(GeminiEmbedder::new(
                credential.to_string(),
                config.embedding.model.clone(),
                config.embedding.dimensions,
                timeout,
            )))
        }
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(
            config.ollama.url.clone(),
            config.ollama.embedding_model.clone(),
            config.embedding.dimensions,
            timeout,
        ))),
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider: {other}"
        ))),
    }
}
