use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::{GenerationError, LlmProvider, Message, Role};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` backend. Built fresh per call from the caller's
/// key; the key never outlives the value and never appears in logs.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model,
        }
    }

    /// Gemini wants the system prompt in a dedicated field and calls the
    /// assistant role "model".
    fn build_request(messages: &[Message], temperature: f32, max_tokens: u32) -> GenerateRequest {
        let system_instruction = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| SystemInstruction { parts: vec![Part { text: m.content.clone() }] });

        let contents = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| ContentEntry {
                role: match m.role {
                    Role::Assistant => "model",
                    _ => "user",
                },
                parts: vec![Part { text: m.content.clone() }],
            })
            .collect();

        GenerateRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig { temperature, max_output_tokens: max_tokens },
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<ContentEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct ContentEntry {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key,
        );

        debug!(model = self.model.as_str(), "gemini completion request");

        let response = self
            .client
            .post(&url)
            .json(&Self::build_request(&messages, temperature, max_tokens))
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GenerationError::Parse("response contains no candidate text".into()))
    }
}
