use thiserror::Error;

use docsage_index::IndexError;
use docsage_ingest::LoadError;
use docsage_llm::GenerationError;

/// Ingestion-phase failures. These surface directly from `process`; the
/// session keeps whatever index it had before.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("an API credential is required to process documents")]
    MissingCredential,

    #[error("nothing to ingest: provide files or a URL")]
    NoSources,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Query-phase failures. These are never raised to the caller; the session
/// renders them into an assistant turn and returns to idle.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no documents are indexed yet; process files or a URL first")]
    IndexUnavailable,

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] IndexError),

    #[error("answer generation failed: {0}")]
    Generation(#[from] GenerationError),
}
