//! Context assembly for twin answers.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::knowledge_base::{KnowledgeBase, RankedPassage};
use crate::websearch::{format_web_results, should_search_web, WebSearchClient};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of passages to include in the context.
const DEFAULT_MAX_CHUNKS: usize = 5;

/// The bounded prompt context for one query.
#[derive(Debug, Default)]
pub struct AssembledContext {
    /// Ranked passages backing the context block.
    pub passages: Vec<RankedPassage>,
    /// Labeled channel context, empty when retrieval found nothing.
    pub context_block: String,
    /// Labeled web-search summaries, empty when not triggered or unavailable.
    pub web_block: String,
}

/// Builds bounded contexts from the knowledge base and optional web search.
pub struct ContextBuilder {
    knowledge_base: KnowledgeBase,
    embedder: Arc<dyn Embedder>,
    web_search: Option<WebSearchClient>,
    max_chunks: usize,
}

impl ContextBuilder {
    /// Create a context builder over a loaded knowledge base.
    pub fn new(knowledge_base: KnowledgeBase, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            knowledge_base,
            embedder,
            web_search: None,
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }

    /// Set the maximum number of context passages.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Attach an optional web-search client.
    pub fn with_web_search(mut self, web_search: Option<WebSearchClient>) -> Self {
        self.web_search = web_search;
        self
    }

    /// Assemble the context for a question.
    ///
    /// A failed query embedding degrades to an empty channel context (no
    /// context beats a dimensionally undefined lookup). A ranking
    /// dimension mismatch is a real corruption signal and fails the query.
    /// Web search runs only for recency-sensitive questions and never
    /// blocks the answer path.
    pub async fn assemble(&self, question: &str) -> Result<AssembledContext> {
        let mut assembled = AssembledContext::default();

        if let Some(client) = &self.web_search {
            if should_search_web(question) {
                debug!("Performing web search for: {}", question);
                assembled.web_block = format_web_results(&client.search(question).await);
            }
        }

        if self.knowledge_base.is_empty() {
            return Ok(assembled);
        }

        let query_embedding = match self.embedder.embed(question).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Query embedding failed, answering without context: {}", e);
                return Ok(assembled);
            }
        };

        let ranked = self.knowledge_base.rank(&query_embedding, self.max_chunks)?;

        assembled.context_block = format_context_block(&ranked);
        assembled.passages = ranked;
        Ok(assembled)
    }
}

/// Join ranked passages into a labeled context block, blank-line separated.
fn format_context_block(passages: &[RankedPassage]) -> String {
    if passages.is_empty() {
        return String::new();
    }

    let joined: Vec<&str> = passages.iter().map(|r| r.passage.text.as_str()).collect();
    format!("\n\nContext from the channel:\n{}", joined.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StemmeError;
    use crate::knowledge_base::Passage;
    use async_trait::async_trait;

    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(StemmeError::Embedding("down".to_string()))
        }
    }

    fn kb() -> KnowledgeBase {
        KnowledgeBase::new(vec![
            Passage {
                text: "A".to_string(),
                video_id: "v1".to_string(),
                embedding: vec![1.0, 0.0],
            },
            Passage {
                text: "B".to_string(),
                video_id: "v1".to_string(),
                embedding: vec![0.0, 1.0],
            },
        ])
    }

    #[tokio::test]
    async fn test_assemble_picks_most_similar() {
        let builder =
            ContextBuilder::new(kb(), Arc::new(FixedEmbedder(vec![1.0, 0.0]))).with_max_chunks(1);

        let assembled = builder.assemble("anything").await.unwrap();
        assert_eq!(assembled.passages.len(), 1);
        assert_eq!(assembled.passages[0].passage.text, "A");
        assert!((assembled.passages[0].score - 1.0).abs() < 0.001);
        assert!(assembled.context_block.contains("Context from the channel:"));
        assert!(assembled.context_block.contains("A"));
        assert!(assembled.web_block.is_empty());
    }

    #[tokio::test]
    async fn test_assemble_joins_with_blank_lines() {
        let builder = ContextBuilder::new(kb(), Arc::new(FixedEmbedder(vec![1.0, 0.0])));
        let assembled = builder.assemble("anything").await.unwrap();
        assert!(assembled.context_block.contains("A\n\nB"));
    }

    #[tokio::test]
    async fn test_embedding_failure_degrades_to_no_context() {
        let builder = ContextBuilder::new(kb(), Arc::new(FailingEmbedder));
        let assembled = builder.assemble("anything").await.unwrap();
        assert!(assembled.passages.is_empty());
        assert!(assembled.context_block.is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_fails_query() {
        let builder = ContextBuilder::new(kb(), Arc::new(FixedEmbedder(vec![1.0, 0.0, 0.0])));
        assert!(matches!(
            builder.assemble("anything").await,
            Err(StemmeError::DimensionMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_knowledge_base_yields_empty_context() {
        let builder = ContextBuilder::new(KnowledgeBase::default(), Arc::new(FailingEmbedder));
        let assembled = builder.assemble("anything").await.unwrap();
        assert!(assembled.context_block.is_empty());
    }
}
