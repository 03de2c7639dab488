use std::sync::Arc;

use crate::embedding::{Embedder, EmbeddingError};
use crate::store::{IndexError, ScoredChunk, VectorIndex};

/// Maps a question to its most relevant chunks: embed the query with the
/// same backend the index was built with, then exact top-k search.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self { embedder, top_k }
    }

    pub async fn retrieve(
        &self,
        index: &VectorIndex,
        query: &str,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        let vectors = self.embedder.embed_batch(&[query]).await?;
        let query_vector = vectors.into_iter().next().ok_or_else(|| {
            EmbeddingError::Parse("no embedding returned for query".to_string())
        })?;

        let hits = index.search(&query_vector, self.top_k)?;
        tracing::debug!(hits = hits.len(), top_k = self.top_k, "retrieved context");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docsage_core::Chunk;
    use std::collections::HashMap;

    struct MapEmbedder {
        vectors: HashMap<String, Vec<f32>>,
    }

    #[async_trait]
    impl Embedder for MapEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            texts
                .iter()
                .map(|t| {
                    self.vectors
                        .get(*t)
                        .cloned()
                        .ok_or_else(|| EmbeddingError::Parse(format!("no vector for {t:?}")))
                })
                .collect()
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn map_embedder(pairs: &[(&str, [f32; 2])]) -> Arc<MapEmbedder> {
        Arc::new(MapEmbedder {
            vectors: pairs.iter().map(|(t, v)| (t.to_string(), v.to_vec())).collect(),
        })
    }

    fn chunk(text: &str) -> Chunk {
        Chunk::new(text.to_string(), HashMap::new())
    }

    #[tokio::test]
    async fn returns_top_k_nearest_chunks() {
        let embedder = map_embedder(&[
            ("red", [1.0, 0.0]),
            ("orange", [0.8, 0.6]),
            ("blue", [0.0, 1.0]),
            ("what is red?", [1.0, 0.1]),
        ]);
        let index = VectorIndex::build(
            vec![chunk("red"), chunk("orange"), chunk("blue")],
            embedder.as_ref(),
            8,
        )
        .await
        .unwrap();

        let retriever = Retriever::new(embedder, 2);
        let hits = retriever.retrieve(&index, "what is red?").await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.text, "red");
        assert_eq!(hits[1].chunk.text, "orange");
    }

    #[tokio::test]
    async fn unknown_query_surfaces_embedding_error() {
        let embedder = map_embedder(&[("only", [1.0, 0.0])]);
        let index = VectorIndex::build(vec![chunk("only")], embedder.as_ref(), 8)
            .await
            .unwrap();

        let retriever = Retriever::new(embedder, 3);
        let result = retriever.retrieve(&index, "never embedded").await;
        assert!(matches!(result, Err(IndexError::Embedding(EmbeddingError::Parse(_)))));
    }
}
