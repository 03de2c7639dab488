pub mod gemini;
pub mod ollama;

use std::time::Duration;

use docsage_core::config::{HttpConfig, LlmConfig, OllamaConfig};

use crate::provider::{GenerationError, LlmProvider};

/// Create the configured generation backend. The credential is consumed
/// here; callers pass it per request and never store it.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
    http_config: &HttpConfig,
    credential: &str,
) -> Result<Box<dyn LlmProvider>, GenerationError> {
    let timeout = Duration::from_secs(http_config.api_timeout_secs);

    match llm_config.provider.as_str() {
        "gemini" => {
            if credential.trim().is_empty() {
                return Err(GenerationError::NotConfigured(
                    "gemini generation requires an API key".into(),
                ));
            }
            Ok(Box::new(gemini::GeminiProvider::new(
                credential.to_string(),
                llm_config.model.clone(),
                timeout,
            )))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
            timeout,
        ))),
        other => Err(GenerationError::NotConfigured(format!(
            "unknown LLM provider: '{other}'"
        ))),
    }
}
