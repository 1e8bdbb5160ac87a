//! Ingestion pipeline for Stemme.
//!
//! Coordinates listing, transcript fetching, chunking, and embedding into a
//! fully rebuilt knowledge base. One run fully replaces the twin's stored
//! passages; a run that produces nothing leaves the previous state alone.

use crate::chunking::Chunker;
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, StemmeError};
use crate::knowledge_base::{KnowledgeBase, Passage};
use crate::twin::{TwinMetadata, TwinStore};
use crate::youtube::{ChannelRef, VideoSource, YoutubeSource};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The ingestion pipeline.
pub struct Ingestor {
    source: Arc<dyn VideoSource>,
    embedder: Arc<dyn Embedder>,
    chunker: Chunker,
    twins: TwinStore,
    default_limit: usize,
    max_videos: usize,
}

impl Ingestor {
    /// Create an ingestor with the live YouTube source and configured embedder.
    pub fn new(settings: &Settings) -> Result<Self> {
        let source = Arc::new(YoutubeSource::new(settings)?);
        let embedder = Arc::new(OpenAIEmbedder::new(settings));
        Self::with_components(settings, source, embedder)
    }

    /// Create an ingestor with custom components.
    pub fn with_components(
        settings: &Settings,
        source: Arc<dyn VideoSource>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        Ok(Self {
            source,
            embedder,
            chunker: Chunker::new(settings.chunking.size, settings.chunking.overlap)?,
            twins: TwinStore::new(&settings.twins_dir()),
            default_limit: settings.ingest.default_limit,
            max_videos: settings.ingest.max_videos,
        })
    }

    /// Build a twin's knowledge base from its channel.
    ///
    /// Creates the twin if it does not exist, otherwise fully rebuilds its
    /// knowledge base. Videos without transcripts and chunks that fail
    /// embedding are skipped and counted; a run yielding zero passages
    /// fails with `EmptyKnowledgeBase` and leaves the previous file
    /// untouched.
    #[instrument(skip(self, title, description))]
    pub async fn build_twin(
        &self,
        twin_id: &str,
        channel: &str,
        limit: Option<usize>,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<IngestReport> {
        TwinStore::validate_id(twin_id)?;

        let mut metadata = if self.twins.exists(twin_id) {
            self.twins.load(twin_id)?
        } else {
            let title = title.unwrap_or(twin_id);
            TwinMetadata::new(twin_id, title, description.unwrap_or(""), channel)
        };
        if let Some(title) = title {
            metadata.title = title.to_string();
        }
        if let Some(description) = description {
            metadata.description = description.to_string();
        }
        metadata.channel_url = channel.to_string();

        let report = self.build(&mut metadata, limit).await?;
        self.twins.save(&metadata)?;
        Ok(report)
    }

    /// Run the pipeline for an existing twin, updating its metadata counts.
    async fn build(&self, twin: &mut TwinMetadata, limit: Option<usize>) -> Result<IngestReport> {
        let limit = limit
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_videos);

        let reference = ChannelRef::parse(&twin.channel_url);
        let channel_id = self.source.resolve_channel(&reference).await?;
        info!("Resolved {} to channel {}", reference, channel_id);

        let video_ids = self.source.list_videos(&channel_id, limit).await?;
        info!("Listed {} videos (limit {})", video_ids.len(), limit);

        let mut report = IngestReport {
            channel_id,
            videos_listed: video_ids.len(),
            ..IngestReport::default()
        };
        let mut passages: Vec<Passage> = Vec::new();

        for video_id in &video_ids {
            let transcript = match self.source.fetch_transcript(video_id).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping video {}: {}", video_id, e);
                    report.videos_skipped += 1;
                    continue;
                }
            };

            let mut video_passages = 0;
            for chunk in self.chunker.chunk(&transcript) {
                match self.embedder.embed(&chunk).await {
                    Ok(embedding) => {
                        passages.push(Passage {
                            text: chunk,
                            video_id: video_id.clone(),
                            embedding,
                        });
                        video_passages += 1;
                    }
                    Err(e) => {
                        warn!("Skipping chunk of video {}: {}", video_id, e);
                        report.failed_embeddings += 1;
                    }
                }
            }

            if video_passages > 0 {
                report.videos_ingested += 1;
            }
        }

        if passages.is_empty() {
            return Err(StemmeError::EmptyKnowledgeBase);
        }

        let kb = KnowledgeBase::new(passages);
        report.passages = kb.len();
        kb.save(&self.twins.knowledge_base_path(&twin.id))?;

        twin.trained_at = Some(Utc::now());
        twin.passage_count = kb.len();
        twin.video_count = kb.video_count();

        info!(
            "Built knowledge base for '{}': {} passages from {} videos",
            twin.id, report.passages, report.videos_ingested
        );
        Ok(report)
    }
}

/// Outcome of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Resolved channel ID.
    pub channel_id: String,
    /// Videos returned by the lister.
    pub videos_listed: usize,
    /// Videos that contributed at least one passage.
    pub videos_ingested: usize,
    /// Videos skipped for missing/empty transcripts.
    pub videos_skipped: usize,
    /// Chunks dropped because embedding failed.
    pub failed_embeddings: usize,
    /// Total passages stored.
    pub passages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Canned source: a fixed video list, some without transcripts.
    struct FakeSource {
        videos: Vec<String>,
        transcripts: HashMap<String, String>,
    }

    #[async_trait]
    impl VideoSource for FakeSource {
        async fn resolve_channel(&self, _reference: &ChannelRef) -> Result<String> {
            Ok("UCfake".to_string())
        }

        async fn list_videos(&self, _channel_id: &str, limit: usize) -> Result<Vec<String>> {
            Ok(self.videos.iter().take(limit).cloned().collect())
        }

        async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
            self.transcripts
                .get(video_id)
                .cloned()
                .ok_or_else(|| StemmeError::NoTranscript(video_id.to_string()))
        }
    }

    /// Deterministic embedder; fails on chunks containing "poison".
    struct FakeEmbedder;

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("poison") {
                return Err(StemmeError::Embedding("poisoned chunk".to_string()));
            }
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    fn test_settings(dir: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.general.data_dir = dir.to_string_lossy().to_string();
        settings.chunking.size = 20;
        settings.chunking.overlap = 5;
        settings
    }

    fn ingestor_with(
        settings: &Settings,
        videos: Vec<&str>,
        transcripts: &[(&str, &str)],
    ) -> Ingestor {
        let source = FakeSource {
            videos: videos.into_iter().map(String::from).collect(),
            transcripts: transcripts
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        Ingestor::with_components(settings, Arc::new(source), Arc::new(FakeEmbedder)).unwrap()
    }

    #[tokio::test]
    async fn test_partial_failure_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let long = "a long enough transcript that produces several chunks of text";
        let ingestor = ingestor_with(
            &settings,
            vec!["v1", "v2", "v3", "v4"],
            &[("v1", long), ("v3", long)],
        );

        let report = ingestor
            .build_twin("demo", "@somechannel", Some(10), None, None)
            .await
            .unwrap();

        assert_eq!(report.videos_listed, 4);
        assert_eq!(report.videos_ingested, 2);
        assert_eq!(report.videos_skipped, 2);
        assert!(report.passages > 0);

        let store = TwinStore::new(&settings.twins_dir());
        let kb = KnowledgeBase::load(&store.knowledge_base_path("demo")).unwrap();
        assert_eq!(kb.len(), report.passages);
        assert_eq!(kb.video_count(), 2);

        let metadata = store.load("demo").unwrap();
        assert!(metadata.trained_at.is_some());
        assert_eq!(metadata.passage_count, report.passages);
        assert_eq!(metadata.video_count, 2);
    }

    #[tokio::test]
    async fn test_embedding_failures_skip_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        // First chunk embeds fine, the poisoned window is dropped.
        let ingestor = ingestor_with(
            &settings,
            vec!["v1"],
            &[("v1", "clean text here then poison appears and more text after")],
        );

        let report = ingestor
            .build_twin("demo", "@c", None, None, None)
            .await
            .unwrap();

        assert!(report.failed_embeddings > 0);
        assert!(report.passages > 0);
        assert_eq!(report.videos_ingested, 1);
    }

    #[tokio::test]
    async fn test_empty_result_preserves_previous_knowledge_base() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());

        let good = ingestor_with(&settings, vec!["v1"], &[("v1", "some transcript text")]);
        let first = good
            .build_twin("demo", "@c", None, None, None)
            .await
            .unwrap();
        assert!(first.passages > 0);

        // Second run finds no transcripts at all.
        let bad = ingestor_with(&settings, vec!["v1", "v2"], &[]);
        let err = bad.build_twin("demo", "@c", None, None, None).await;
        assert!(matches!(err, Err(StemmeError::EmptyKnowledgeBase)));

        // Previous knowledge base is still intact.
        let store = TwinStore::new(&settings.twins_dir());
        let kb = KnowledgeBase::load(&store.knowledge_base_path("demo")).unwrap();
        assert_eq!(kb.len(), first.passages);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_not_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let ingestor = ingestor_with(&settings, vec!["v1"], &[("v1", "stable transcript text")]);

        let first = ingestor
            .build_twin("demo", "@c", None, None, None)
            .await
            .unwrap();
        let second = ingestor
            .build_twin("demo", "@c", None, None, None)
            .await
            .unwrap();

        assert_eq!(first.passages, second.passages);
        let store = TwinStore::new(&settings.twins_dir());
        let kb = KnowledgeBase::load(&store.knowledge_base_path("demo")).unwrap();
        assert_eq!(kb.len(), second.passages);
    }

    #[tokio::test]
    async fn test_limit_clamped_to_max_videos() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = test_settings(dir.path());
        settings.ingest.max_videos = 2;
        let ingestor = ingestor_with(
            &settings,
            vec!["v1", "v2", "v3"],
            &[("v1", "text one"), ("v2", "text two"), ("v3", "text three")],
        );

        let report = ingestor
            .build_twin("demo", "@c", Some(100), None, None)
            .await
            .unwrap();
        assert_eq!(report.videos_listed, 2);
    }
}
