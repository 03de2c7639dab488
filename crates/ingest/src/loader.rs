use std::time::Duration;

use docsage_core::{Document, UploadedFile};

use crate::document;
use crate::error::LoadError;
use crate::web;

/// Turn the caller's sources into documents: files in list order, then the
/// URL page last. Any failure abandons the whole batch.
pub async fn load(
    files: &[UploadedFile],
    url: Option<&str>,
    fetch_timeout: Duration,
) -> Result<Vec<Document>, LoadError> {
    let mut documents = Vec::with_capacity(files.len() + usize::from(url.is_some()));

    for file in files {
        let extracted = document::extract_file(file)?;
        if extracted.text.trim().is_empty() {
            return Err(LoadError::EmptyContent { origin: file.name.clone() });
        }
        tracing::debug!(
            source = file.name.as_str(),
            format = extracted.format,
            chars = extracted.text.chars().count(),
            "loaded file"
        );
        documents.push(Document::new(extracted.text, &file.name, extracted.format));
    }

    if let Some(url) = url {
        let text = web::fetch_url(url, fetch_timeout).await?;
        if text.trim().is_empty() {
            return Err(LoadError::EmptyContent { origin: url.to_string() });
        }
        tracing::debug!(source = url, chars = text.chars().count(), "loaded page");
        documents.push(Document::new(text, url, "url"));
    }

    tracing::info!(documents = documents.len(), "sources loaded");
    Ok(documents)
}
