//! End-to-end engine tests over fake model backends.
//!
//! Exercises the complete flow: upload → extract → chunk → embed → index,
//! then question → retrieve → generate → transcript. The embedder is a
//! deterministic bag-of-words hash and the generator replays a scripted
//! queue, so every run retrieves and answers identically.

use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use docsage_chat::{
    ChatEngine, Phase, ProcessError, ProviderFactory, RejectReason, SubmitOutcome,
};
use docsage_core::{Config, UploadedFile};
use docsage_index::{Embedder, EmbeddingError};
use docsage_llm::{GenerationError, LlmProvider, Message, Role};

const DIMS: usize = 64;

// ── Fake backends ───────────────────────────────────────────────────────

/// Bag-of-words embedding: each lowercased token bumps a hashed bucket.
/// Texts sharing vocabulary get nearby vectors, and the same text always
/// gets the same vector.
struct HashEmbedder {
    fail: AtomicBool,
}

impl HashEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; DIMS];
        for token in text.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            v[(hasher.finish() as usize) % DIMS] += 1.0;
        }
        v
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Api {
                status: 503,
                body: "embedding backend down".to_string(),
            });
        }
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        DIMS
    }
}

type ScriptQueue = Arc<Mutex<VecDeque<Result<String, u16>>>>;
type RecordedCalls = Arc<Mutex<Vec<Vec<Message>>>>;

/// Generator that records every prompt it sees and answers from a queue.
/// An empty queue falls back to a fixed reply.
struct ScriptedProvider {
    queue: ScriptQueue,
    calls: RecordedCalls,
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(messages);
        match self.queue.lock().unwrap().pop_front() {
            None => Ok("stub answer".to_string()),
            Some(Ok(text)) => Ok(text),
            Some(Err(status)) => {
                Err(GenerationError::Api { status, body: "scripted failure".to_string() })
            }
        }
    }
}

struct FakeFactory {
    embedder: Arc<HashEmbedder>,
    queue: ScriptQueue,
    calls: RecordedCalls,
    require_credential: bool,
}

impl ProviderFactory for FakeFactory {
    fn embedder(
        &self,
        _config: &Config,
        _credential: &str,
    ) -> Result<Arc<dyn Embedder>, EmbeddingError> {
        Ok(self.embedder.clone())
    }

    fn generator(
        &self,
        _config: &Config,
        _credential: &str,
    ) -> Result<Box<dyn LlmProvider>, GenerationError> {
        Ok(Box::new(ScriptedProvider { queue: self.queue.clone(), calls: self.calls.clone() }))
    }

    fn credential_required(&self, _config: &Config) -> bool {
        self.require_credential
    }
}

/// Handles the tests keep after the factory moves into the engine.
struct Handles {
    embedder: Arc<HashEmbedder>,
    queue: ScriptQueue,
    calls: RecordedCalls,
}

impl Handles {
    fn push_reply(&self, text: &str) {
        self.queue.lock().unwrap().push_back(Ok(text.to_string()));
    }

    fn push_failure(&self, status: u16) {
        self.queue.lock().unwrap().push_back(Err(status));
    }

    fn break_embedder(&self) {
        self.embedder.fail.store(true, Ordering::SeqCst);
    }

    fn recorded_prompts(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }

    fn last_user_prompt(&self) -> String {
        let calls = self.calls.lock().unwrap();
        let messages = calls.last().expect("at least one model call");
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .expect("a user message in the prompt")
            .content
            .clone()
    }
}

fn rigged_engine_with(config: Config, require_credential: bool) -> (ChatEngine, Handles) {
    let embedder = Arc::new(HashEmbedder { fail: AtomicBool::new(false) });
    let queue: ScriptQueue = Arc::new(Mutex::new(VecDeque::new()));
    let calls: RecordedCalls = Arc::new(Mutex::new(Vec::new()));
    let factory = FakeFactory {
        embedder: embedder.clone(),
        queue: queue.clone(),
        calls: calls.clone(),
        require_credential,
    };
    let engine = ChatEngine::with_factory(config, Box::new(factory));
    (engine, Handles { embedder, queue, calls })
}

fn rigged_engine() -> (ChatEngine, Handles) {
    rigged_engine_with(Config::default(), false)
}

fn txt(name: &str, text: &str) -> UploadedFile {
    UploadedFile::new(name, text.as_bytes().to_vec())
}

fn fact_files() -> Vec<UploadedFile> {
    vec![
        txt("capitals.txt", "Paris is the capital of France."),
        txt("biology.txt", "The mitochondria is the powerhouse of the cell."),
        txt("space.txt", "Jupiter is the largest planet in the solar system."),
        txt("food.txt", "Honey never spoils when it is stored sealed."),
    ]
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn documents_answer_questions_end_to_end() {
    let (mut engine, handles) = rigged_engine();
    handles.push_reply("The capital of France is Paris.");

    // ── Ingest four one-fact files ──────────────────────────────────
    let report = engine.process(fact_files(), None, "test-key").await.unwrap();
    assert_eq!(report.documents, 4);
    assert_eq!(report.chunks, 4);
    assert!(engine.state().documents_ready());

    // ── Ask and check the grounded prompt ───────────────────────────
    let outcome = engine.submit("What is the capital of France?", "test-key").await;
    assert_eq!(outcome, SubmitOutcome::Accepted);

    let prompt = handles.last_user_prompt();
    assert!(prompt.contains("Paris is the capital of France."));
    assert!(prompt.contains("What is the capital of France?"));

    let calls = handles.recorded_prompts();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0].role, Role::System);

    // ── Transcript holds the full turn ──────────────────────────────
    let history = engine.history();
    assert_eq!(history.len(), 2);
    assert!(history[0].is_user());
    assert_eq!(history[0].text, "What is the capital of France?");
    assert!(!history[1].is_user());
    assert_eq!(history[1].text, "The capital of France is Paris.");
    assert_eq!(engine.state().phase(), Phase::Idle);
}

#[tokio::test]
async fn small_windows_split_a_short_document_in_two() {
    let mut config = Config::default();
    config.chunking.chunk_size = 20;
    config.chunking.chunk_overlap = 5;
    let (mut engine, _handles) = rigged_engine_with(config, false);

    let files = vec![txt("sky.txt", "The sky is blue. Grass is green.")];
    let report = engine.process(files, None, "test-key").await.unwrap();

    assert_eq!(report.documents, 1);
    assert_eq!(report.chunks, 2);
}

#[tokio::test]
async fn repeated_questions_build_identical_prompts() {
    let (mut engine, handles) = rigged_engine();
    engine.process(fact_files(), None, "test-key").await.unwrap();

    engine.submit("Which planet is the largest?", "test-key").await;
    let first = handles.last_user_prompt();
    engine.submit("Which planet is the largest?", "test-key").await;
    let second = handles.last_user_prompt();

    assert_eq!(first, second);
}

#[tokio::test]
async fn failed_ingest_on_a_fresh_session_installs_nothing() {
    let (mut engine, handles) = rigged_engine();
    handles.break_embedder();

    let result = engine.process(fact_files(), None, "test-key").await;
    assert!(matches!(result, Err(ProcessError::Index(_))));
    assert!(!engine.state().documents_ready());
    assert!(engine.state().index().is_none());
}

#[tokio::test]
async fn failed_reingest_keeps_the_previous_index() {
    let (mut engine, handles) = rigged_engine();
    let report = engine.process(fact_files(), None, "test-key").await.unwrap();
    assert_eq!(report.chunks, 4);

    handles.break_embedder();
    let files = vec![txt("more.txt", "Another document entirely.")];
    let result = engine.process(files, None, "test-key").await;

    assert!(matches!(result, Err(ProcessError::Index(_))));
    assert!(engine.state().documents_ready());
    assert_eq!(engine.state().index().map(|i| i.len()), Some(4));
}

#[tokio::test]
async fn unsupported_files_fail_before_any_indexing() {
    let (mut engine, _handles) = rigged_engine();

    let files = vec![txt("notes.xyz", "content in a format nobody knows")];
    let result = engine.process(files, None, "test-key").await;

    assert!(matches!(result, Err(ProcessError::Load(_))));
    assert!(!engine.state().documents_ready());
}

#[tokio::test]
async fn processing_without_sources_is_an_error() {
    let (mut engine, _handles) = rigged_engine();
    let result = engine.process(Vec::new(), None, "test-key").await;
    assert!(matches!(result, Err(ProcessError::NoSources)));
}

#[tokio::test]
async fn generation_failure_becomes_one_error_turn() {
    let (mut engine, handles) = rigged_engine();
    engine.process(fact_files(), None, "test-key").await.unwrap();
    handles.push_failure(429);
    handles.push_reply("Recovered fine.");

    engine.submit("What does honey do?", "test-key").await;

    let history = engine.history();
    assert_eq!(history.len(), 2);
    assert!(!history[1].is_user());
    assert!(history[1].text.starts_with("Error:"));
    assert!(history[1].text.contains("429"));
    assert_eq!(engine.state().phase(), Phase::Idle);

    // The next question goes through untouched.
    engine.submit("What does honey do?", "test-key").await;
    assert_eq!(engine.history().len(), 4);
    assert_eq!(engine.history()[3].text, "Recovered fine.");
}

#[tokio::test]
async fn questions_before_processing_get_an_error_turn() {
    let (mut engine, handles) = rigged_engine();

    let outcome = engine.submit("What do my documents say?", "test-key").await;
    assert_eq!(outcome, SubmitOutcome::Accepted);

    let history = engine.history();
    assert_eq!(history.len(), 2);
    assert!(history[1].text.starts_with("Error:"));
    assert!(history[1].text.contains("no documents are indexed"));
    assert!(handles.recorded_prompts().is_empty());
}

#[tokio::test]
async fn blank_questions_never_reach_the_model() {
    let (mut engine, handles) = rigged_engine();
    engine.process(fact_files(), None, "test-key").await.unwrap();

    let outcome = engine.submit("   \n", "test-key").await;

    assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::EmptyInput));
    assert!(engine.history().is_empty());
    assert!(handles.recorded_prompts().is_empty());
}

#[tokio::test]
async fn missing_credential_blocks_processing_and_questions() {
    let (mut engine, handles) = rigged_engine_with(Config::default(), true);

    let result = engine.process(fact_files(), None, "  ").await;
    assert!(matches!(result, Err(ProcessError::MissingCredential)));
    assert!(!engine.state().documents_ready());

    engine.process(fact_files(), None, "real-key").await.unwrap();

    let outcome = engine.submit("A question", "").await;
    assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::MissingCredential));
    assert!(engine.history().is_empty());
    assert!(handles.recorded_prompts().is_empty());
}

#[tokio::test]
async fn redriving_the_engine_after_an_answer_does_nothing() {
    let (mut engine, _handles) = rigged_engine();
    engine.process(fact_files(), None, "test-key").await.unwrap();

    engine.submit("Which planet is the largest?", "test-key").await;
    assert_eq!(engine.history().len(), 2);

    let did_work = engine.generate_pending("test-key").await;
    assert!(!did_work);
    assert_eq!(engine.history().len(), 2);
}
