//! Seam between the engine and the model backends.
//!
//! The engine asks a [`ProviderFactory`] for embedders and generators
//! instead of constructing them itself, so tests can swap in fakes without
//! touching any HTTP client. Credentials pass through per call and are
//! never stored on the factory.

use std::sync::Arc;

use docsage_core::Config;
use docsage_index::{create_embedder, Embedder, EmbeddingError};
use docsage_llm::{create_provider, GenerationError, LlmProvider};

pub trait ProviderFactory: Send + Sync {
    fn embedder(
        &self,
        config: &Config,
        credential: &str,
    ) -> Result<Arc<dyn Embedder>, EmbeddingError>;

    fn generator(
        &self,
        config: &Config,
        credential: &str,
    ) -> Result<Box<dyn LlmProvider>, GenerationError>;

    /// Whether the configured backends need an API credential at all.
    /// Local backends run without one.
    fn credential_required(&self, config: &Config) -> bool;
}

/// Factory backed by the configured real providers.
pub struct ConfiguredProviders;

impl ProviderFactory for ConfiguredProviders {
    fn embedder(
        &self,
        config: &Config,
        credential: &str,
    ) -> Result<Arc<dyn Embedder>, EmbeddingError> {
        create_embedder(config, credential)
    }

    fn generator(
        &self,
        config: &Config,
        credential: &str,
    ) -> Result<Box<dyn LlmProvider>, GenerationError> {
        create_provider(&config.llm, &config.ollama, &config.http, credential)
    }

    fn credential_required(&self, config: &Config) -> bool {
        config.embedding.provider == "gemini" || config.llm.provider == "gemini"
    }
}
