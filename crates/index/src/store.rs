//! In-memory vector index.
//!
//! Holds every chunk next to its embedding and answers exact k-nearest
//! queries by cosine similarity. An index is built in one shot per
//! ingestion and replaced wholesale by the next one; nothing is persisted.

use serde::Serialize;
use thiserror::Error;

use docsage_core::Chunk;

use crate::embedding::{Embedder, EmbeddingError};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot build an index from zero chunks")]
    EmptyIndex,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

/// One retrieval hit: the chunk plus its similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
    norm: f32,
}

pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
}

impl VectorIndex {
    /// Embed all chunks in order-preserving batches and assemble the index.
    /// Any embedding failure abandons the build; the caller keeps whatever
    /// index it had before.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self, IndexError> {
        if chunks.is_empty() {
            return Err(IndexError::EmptyIndex);
        }

        let expected = embedder.dimensions();
        let batch_size = batch_size.max(1);

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());
        for batch in texts.chunks(batch_size) {
            let mut vectors = embedder.embed_batch(batch).await?;
            if vectors.len() != batch.len() {
                return Err(EmbeddingError::Parse(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    vectors.len()
                ))
                .into());
            }
            embeddings.append(&mut vectors);
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            if embedding.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                }
                .into());
            }
            let norm = embedding.iter().map(|v| v * v).sum::<f32>().sqrt();
            entries.push(IndexEntry { chunk, embedding, norm });
        }

        tracing::info!(chunks = entries.len(), dimensions = expected, "vector index built");
        Ok(Self { entries, dimensions: expected })
    }

    /// Exact top-k by cosine similarity, highest first. The sort is stable,
    /// so equal scores keep insertion order and repeated searches return
    /// identical results. Asking for more than the index holds returns
    /// everything.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        if query.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            }
            .into());
        }

        let query_norm = query.iter().map(|v| v * v).sum::<f32>().sqrt();

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine(query, query_norm, &entry.embedding, entry.norm)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| ScoredChunk { chunk: self.entries[i].chunk.clone(), score })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn cosine(query: &[f32], query_norm: f32, embedding: &[f32], norm: f32) -> f32 {
    let denom = query_norm * norm;
    if denom <= f32::EPSILON {
        return 0.0;
    }
    let dot: f32 = query.iter().zip(embedding).map(|(a, b)| a * b).sum();
    dot / denom
}
