//! Embedder over an OpenAI-compatible embeddings API.

use super::Embedder;
use crate::config::Settings;
use crate::error::{Result, StemmeError};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::instrument;

/// Embedder backed by the configured OpenAI-compatible endpoint.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedder {
    /// Create an embedder for the configured endpoint and model.
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: create_client(settings),
            model: settings.embedding.model.clone(),
        }
    }

    /// The configured embedding model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::String(text.to_string()))
            .build()
            .map_err(|e| StemmeError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| StemmeError::Embedding(format!("Embedding API error: {}", e)))?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StemmeError::Embedding("Empty embedding response".to_string()))
    }
}
