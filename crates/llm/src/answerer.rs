use docsage_core::Chunk;
use tracing::debug;

use crate::provider::{GenerationError, LlmProvider, Message};

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Use the following context to answer the question.";

/// Build the grounded prompt: retrieved chunk texts in retrieval order,
/// blank-line separated, then the question and an answer cue.
pub fn build_messages(question: &str, context: &[Chunk]) -> Vec<Message> {
    let context_block = context
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            "Context:\n{context_block}\n\nQuestion: {question}\n\nAnswer:"
        )),
    ]
}

/// Turns a question plus retrieved context into one model call.
pub struct Answerer {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl Answerer {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self { provider, temperature, max_tokens }
    }

    /// One grounded completion, no retries. Provider failures surface
    /// unchanged for the caller to render.
    pub async fn answer(
        &self,
        question: &str,
        context: &[Chunk],
    ) -> Result<String, GenerationError> {
        let messages = build_messages(question, context);
        debug!(context_chunks = context.len(), "requesting grounded answer");

        let answer = self
            .provider
            .complete(messages, self.temperature, self.max_tokens)
            .await?;
        Ok(answer.trim().to_string())
    }
}
