//! Embedding generation for semantic retrieval.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
///
/// Output dimensionality is a property of the configured model and is
/// treated as opaque; the knowledge base enforces uniformity at ranking
/// time instead. One text per call: ingestion embeds chunk by chunk so a
/// single failure skips only that chunk.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
