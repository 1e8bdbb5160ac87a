//! YouTube integration: channel resolution, video listing, and transcript
//! retrieval via the public Data API and timedtext endpoint.

mod channel;
mod transcript;

pub use channel::{ChannelRef, YoutubeClient};
pub use transcript::TranscriptFetcher;

use crate::config::Settings;
use crate::error::{Result, StemmeError};
use async_trait::async_trait;

/// Trait for channel content sources.
///
/// The ingestion pipeline talks to this seam so tests can substitute a
/// canned source for the live API.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Resolve a channel reference to a stable channel ID.
    async fn resolve_channel(&self, reference: &ChannelRef) -> Result<String>;

    /// List up to `limit` video IDs for a channel, most recent first.
    async fn list_videos(&self, channel_id: &str, limit: usize) -> Result<Vec<String>>;

    /// Fetch the transcript text for one video.
    async fn fetch_transcript(&self, video_id: &str) -> Result<String>;
}

/// Live YouTube source combining the Data API and timedtext endpoint.
pub struct YoutubeSource {
    channel: YoutubeClient,
    transcripts: TranscriptFetcher,
}

impl YoutubeSource {
    /// Create a source from settings. Requires a YouTube Data API key.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_key = settings.youtube_api_key().ok_or_else(|| {
            StemmeError::Config(
                "YOUTUBE_API_KEY not set. Create a YouTube Data API v3 key and export it."
                    .to_string(),
            )
        })?;

        Ok(Self {
            channel: YoutubeClient::new(&api_key),
            transcripts: TranscriptFetcher::new(&settings.youtube.transcript_language),
        })
    }
}

#[async_trait]
impl VideoSource for YoutubeSource {
    async fn resolve_channel(&self, reference: &ChannelRef) -> Result<String> {
        self.channel.resolve_channel_id(reference).await
    }

    async fn list_videos(&self, channel_id: &str, limit: usize) -> Result<Vec<String>> {
        self.channel.list_videos(channel_id, limit).await
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
        self.transcripts.fetch(video_id).await
    }
}
