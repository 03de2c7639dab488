use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key for the origin of a document (filename or URL).
pub const META_SOURCE: &str = "source";
/// Metadata key for the input format ("pdf", "docx", "txt", "md", "url").
pub const META_FORMAT: &str = "format";

/// A file handed in by the caller, name plus raw bytes. Nothing is ever
/// written to disk on its behalf.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }
}

/// One ingested source, normalized to plain text. Documents exist only
/// between loading and chunking; they are not retained afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(text: String, source: &str, format: &str) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(META_SOURCE.to_string(), source.to_string());
        metadata.insert(META_FORMAT.to_string(), format.to_string());
        Self { text, metadata }
    }

    pub fn source(&self) -> &str {
        self.metadata.get(META_SOURCE).map(String::as_str).unwrap_or("")
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// A contiguous slice of one document's text, the unit of embedding and
/// retrieval. Carries its parent document's metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

impl Chunk {
    pub fn new(text: String, metadata: HashMap<String, String>) -> Self {
        Self { text, metadata }
    }

    pub fn source(&self) -> &str {
        self.metadata.get(META_SOURCE).map(String::as_str).unwrap_or("")
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
