//! Persisted knowledge base of embedded passages and similarity ranking.
//!
//! Each twin owns one knowledge base: an ordered, flat JSON collection of
//! passages. Queries run a full linear scan with cosine similarity, which
//! is plenty at the target scale of hundreds to low thousands of passages.

use crate::error::{Result, StemmeError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One embedded text chunk with its source attribution.
///
/// Immutable once written. Passages without a successfully computed
/// embedding are never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Chunk text.
    pub text: String,
    /// ID of the video this chunk came from.
    pub video_id: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

/// A passage scored against a query. Exists only within a single query
/// evaluation, never persisted.
#[derive(Debug, Clone)]
pub struct RankedPassage {
    /// The matched passage.
    pub passage: Passage,
    /// Cosine similarity in [-1, 1] (higher is better).
    pub score: f32,
}

/// The full ordered collection of passages for one twin.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    passages: Vec<Passage>,
}

impl KnowledgeBase {
    /// Create a knowledge base from accumulated passages.
    pub fn new(passages: Vec<Passage>) -> Self {
        Self { passages }
    }

    /// Load a knowledge base from its JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let passages: Vec<Passage> = serde_json::from_str(&content)?;
        Ok(Self { passages })
    }

    /// Atomically replace the persisted knowledge base.
    ///
    /// Writes to a temp file in the target directory, then renames over the
    /// destination so concurrent readers never see a torn file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| StemmeError::KnowledgeBase(format!("Invalid path: {}", path.display())))?;
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, &self.passages)?;
        tmp.persist(path)
            .map_err(|e| StemmeError::KnowledgeBase(format!("Failed to replace knowledge base: {}", e)))?;
        Ok(())
    }

    /// Number of stored passages.
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether the knowledge base is empty.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// The stored passages, in insertion order.
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Number of distinct source videos.
    pub fn video_count(&self) -> usize {
        let mut ids: Vec<&str> = self.passages.iter().map(|p| p.video_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Rank passages against a query vector, best first.
    ///
    /// Full linear scan with cosine similarity. The sort is stable, so ties
    /// keep storage order. `k` is clamped to the passage count; an empty
    /// store yields an empty result. A passage with a different
    /// dimensionality than the query fails the whole query with
    /// `DimensionMismatch` rather than silently scoring garbage.
    pub fn rank(&self, query: &[f32], k: usize) -> Result<Vec<RankedPassage>> {
        let mut ranked: Vec<RankedPassage> = Vec::with_capacity(self.passages.len());
        for passage in &self.passages {
            let score = cosine_similarity(query, &passage.embedding)?;
            ranked.push(RankedPassage {
                passage: passage.clone(),
                score,
            });
        }

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        Ok(ranked)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Zero-norm vectors score 0.0; mismatched lengths are an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(StemmeError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (norm_a * norm_b))
}
