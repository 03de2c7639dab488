pub mod embedding;
pub mod retriever;
pub mod store;

pub use embedding::{create_embedder, Embedder, EmbeddingError};
pub use retriever::Retriever;
pub use store::{IndexError, ScoredChunk, VectorIndex};
