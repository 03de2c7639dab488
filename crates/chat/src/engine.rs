//! The engine wires the whole pipeline together: ingest sources into a
//! vector index, then drive the session state machine to answer questions
//! grounded in that index.

use std::time::Duration;

use tracing::{debug, info};

use docsage_core::{Config, Turn, UploadedFile};
use docsage_index::{IndexError, Retriever, VectorIndex};
use docsage_ingest::{chunker, loader};
use docsage_llm::Answerer;

use crate::error::{ProcessError, QueryError};
use crate::providers::{ConfiguredProviders, ProviderFactory};
use crate::session::{SessionState, SubmitGuards, SubmitOutcome};

/// What one ingest run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
}

pub struct ChatEngine {
    config: Config,
    state: SessionState,
    factory: Box<dyn ProviderFactory>,
}

impl ChatEngine {
    pub fn new(config: Config) -> Self {
        Self::with_factory(config, Box::new(ConfiguredProviders))
    }

    pub fn with_factory(config: Config, factory: Box<dyn ProviderFactory>) -> Self {
        Self { config, state: SessionState::new(), factory }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &[Turn] {
        self.state.conversation()
    }

    /// Load, chunk, embed, and index the given sources in one pass. The
    /// session's index is replaced only after every step succeeds; a failure
    /// at any point leaves the previous index, if any, untouched.
    pub async fn process(
        &mut self,
        files: Vec<UploadedFile>,
        url: Option<String>,
        credential: &str,
    ) -> Result<IngestReport, ProcessError> {
        if self.factory.credential_required(&self.config) && credential.trim().is_empty() {
            return Err(ProcessError::MissingCredential);
        }
        if files.is_empty() && url.is_none() {
            return Err(ProcessError::NoSources);
        }

        let fetch_timeout = Duration::from_secs(self.config.http.fetch_timeout_secs);
        let documents = loader::load(&files, url.as_deref(), fetch_timeout).await?;
        let chunks = chunker::split_documents(&documents, &self.config.chunking);

        let embedder = self
            .factory
            .embedder(&self.config, credential)
            .map_err(IndexError::from)?;
        let index =
            VectorIndex::build(chunks, embedder.as_ref(), self.config.embedding.batch_size).await?;

        let report = IngestReport { documents: documents.len(), chunks: index.len() };
        self.state.install_index(index);
        info!(documents = report.documents, chunks = report.chunks, "sources processed");
        Ok(report)
    }

    /// Submit a question and, if the guards accept it, answer it before
    /// returning. Rejections report why the question went nowhere.
    pub async fn submit(&mut self, text: &str, credential: &str) -> SubmitOutcome {
        let guards = SubmitGuards {
            credential_present: !self.factory.credential_required(&self.config)
                || !credential.trim().is_empty(),
            sources_pending: false,
        };
        let outcome = self.state.submit(text, guards);
        if outcome == SubmitOutcome::Accepted {
            self.generate_pending(credential).await;
        }
        outcome
    }

    /// Answer the pending question, if any. Returns whether work was done,
    /// so re-driving the engine after an accepted submit is harmless.
    pub async fn generate_pending(&mut self, credential: &str) -> bool {
        let Some(question) = self.state.pending_query().map(str::to_string) else {
            return false;
        };
        let result = self.answer(&question, credential).await;
        self.state.complete(result);
        true
    }

    async fn answer(&self, question: &str, credential: &str) -> Result<String, QueryError> {
        let index = self.state.index().ok_or(QueryError::IndexUnavailable)?;

        let embedder = self
            .factory
            .embedder(&self.config, credential)
            .map_err(IndexError::from)?;
        let retriever = Retriever::new(embedder, self.config.retrieval.top_k);
        let hits = retriever.retrieve(index, question).await?;
        let context: Vec<_> = hits.into_iter().map(|hit| hit.chunk).collect();
        debug!(hits = context.len(), "context retrieved");

        let provider = self.factory.generator(&self.config, credential)?;
        let answerer =
            Answerer::new(provider, self.config.llm.temperature, self.config.llm.max_tokens);
        Ok(answerer.answer(question, &context).await?)
    }
}
