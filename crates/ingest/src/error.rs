use thiserror::Error;

/// Failures while turning user-supplied sources into documents. Any of
/// these aborts the whole ingestion; no partial state is kept.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),
    #[error("no extractable text in {origin}")]
    EmptyContent { origin: String },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("DOCX extraction failed: {0}")]
    Docx(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
