//! Channel reference resolution and video listing via the YouTube Data API.

use crate::error::{Result, StemmeError};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Upstream pagination maximum per request.
const PAGE_SIZE: usize = 50;

/// A parsed reference to a YouTube channel.
///
/// Resolution order: a direct channel ID needs no API call, a handle or a
/// free-text query goes through channel search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// A stable channel ID (`UC...`), taken from a `/channel/` URL.
    Id(String),
    /// A handle, taken from a `youtube.com/@handle` URL or `@handle` input.
    Handle(String),
    /// Free text to search for a channel.
    Query(String),
}

impl ChannelRef {
    /// Parse user input into a channel reference.
    ///
    /// Accepts full channel URLs, `@handle` strings, and bare channel names.
    /// For URLs the trailing path segment is used as a handle when
    /// `@`-prefixed, otherwise as a search query.
    pub fn parse(input: &str) -> ChannelRef {
        let trimmed = input.trim();

        // Accept scheme-less URLs like "youtube.com/@handle"
        let candidate = if !trimmed.contains("://") && trimmed.contains("youtube.com/") {
            format!("https://{}", trimmed)
        } else {
            trimmed.to_string()
        };

        if let Ok(url) = Url::parse(&candidate) {
            let segments: Vec<&str> = url
                .path_segments()
                .map(|s| s.filter(|p| !p.is_empty()).collect())
                .unwrap_or_default();

            for (i, segment) in segments.iter().enumerate() {
                if *segment == "channel" {
                    if let Some(id) = segments.get(i + 1) {
                        return ChannelRef::Id(id.to_string());
                    }
                }
                if let Some(handle) = segment.strip_prefix('@') {
                    return ChannelRef::Handle(handle.to_string());
                }
            }

            if let Some(last) = segments.last() {
                return ChannelRef::Query(last.to_string());
            }
            return ChannelRef::Query(trimmed.to_string());
        }

        if let Some(handle) = trimmed.strip_prefix('@') {
            return ChannelRef::Handle(handle.to_string());
        }

        ChannelRef::Query(trimmed.to_string())
    }
}

impl std::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelRef::Id(id) => write!(f, "channel {}", id),
            ChannelRef::Handle(handle) => write!(f, "@{}", handle),
            ChannelRef::Query(query) => write!(f, "'{}'", query),
        }
    }
}

/// Client for the YouTube Data API v3.
pub struct YoutubeClient {
    http: reqwest::Client,
    api_key: String,
}

impl YoutubeClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_key: api_key.to_string(),
        }
    }

    /// Resolve a channel reference to a channel ID.
    ///
    /// Direct IDs pass through; handles and queries go through channel
    /// search and fail with `SourceNotFound` when nothing matches.
    #[instrument(skip(self))]
    pub async fn resolve_channel_id(&self, reference: &ChannelRef) -> Result<String> {
        let query = match reference {
            ChannelRef::Id(id) => return Ok(id.clone()),
            ChannelRef::Handle(handle) => handle.clone(),
            ChannelRef::Query(query) => query.clone(),
        };

        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", "channel"),
                ("q", query.as_str()),
                ("maxResults", "1"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StemmeError::Upstream(format!(
                "YouTube channel search failed: HTTP {}",
                response.status()
            )));
        }

        let data: SearchResponse = response.json().await?;
        let channel_id = data
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet.and_then(|s| s.channel_id))
            .ok_or_else(|| StemmeError::SourceNotFound(query.clone()))?;

        debug!("Resolved {} to channel {}", reference, channel_id);
        Ok(channel_id)
    }

    /// List up to `limit` video IDs for a channel, most recent first.
    ///
    /// Paginates the search endpoint in pages of at most 50 until the limit
    /// is reached or there is no next-page token. Fewer results than
    /// requested is not an error.
    #[instrument(skip(self))]
    pub async fn list_videos(&self, channel_id: &str, limit: usize) -> Result<Vec<String>> {
        let mut video_ids: Vec<String> = Vec::new();
        let mut page_token: Option<String> = None;

        while video_ids.len() < limit {
            let page = self
                .fetch_video_page(channel_id, page_request_size(video_ids.len(), limit), page_token.as_deref())
                .await?;

            page_token = accumulate_page(&mut video_ids, page, limit);
            if page_token.is_none() {
                break;
            }
        }

        debug!("Listed {} videos for channel {}", video_ids.len(), channel_id);
        Ok(video_ids)
    }

    /// Fetch one page of the video search.
    async fn fetch_video_page(
        &self,
        channel_id: &str,
        max_results: usize,
        page_token: Option<&str>,
    ) -> Result<SearchResponse> {
        let max_results = max_results.to_string();
        let mut request = self.http.get(SEARCH_URL).query(&[
            ("part", "id"),
            ("channelId", channel_id),
            ("maxResults", max_results.as_str()),
            ("order", "date"),
            ("type", "video"),
            ("key", self.api_key.as_str()),
        ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(StemmeError::Upstream(format!(
                "YouTube video listing failed: HTTP {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

/// How many results to request for the next page.
fn page_request_size(collected: usize, limit: usize) -> usize {
    PAGE_SIZE.min(limit - collected)
}

/// Fold one parsed search page into the accumulated video list.
///
/// Items without a video ID are skipped. Returns the token to fetch the
/// next page with, or `None` when the limit is reached or the API reports
/// no further pages.
fn accumulate_page(
    video_ids: &mut Vec<String>,
    page: SearchResponse,
    limit: usize,
) -> Option<String> {
    for item in page.items {
        if let Some(video_id) = item.id.and_then(|id| id.video_id) {
            video_ids.push(video_id);
            if video_ids.len() >= limit {
                return None;
            }
        }
    }
    page.next_page_token
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel_url() {
        assert_eq!(
            ChannelRef::parse("https://www.youtube.com/channel/UCHnyfMqiRRG1u-2MsSQLbXA"),
            ChannelRef::Id("UCHnyfMqiRRG1u-2MsSQLbXA".to_string())
        );
        assert_eq!(
            ChannelRef::parse("https://www.youtube.com/channel/UCHnyfMqiRRG1u-2MsSQLbXA/videos"),
            ChannelRef::Id("UCHnyfMqiRRG1u-2MsSQLbXA".to_string())
        );
    }

    #[test]
    fn test_parse_handle_url() {
        assert_eq!(
            ChannelRef::parse("https://www.youtube.com/@veritasium"),
            ChannelRef::Handle("veritasium".to_string())
        );
        assert_eq!(
            ChannelRef::parse("https://youtube.com/@veritasium/videos"),
            ChannelRef::Handle("veritasium".to_string())
        );
    }

    #[test]
    fn test_parse_bare_handle() {
        assert_eq!(
            ChannelRef::parse("@veritasium"),
            ChannelRef::Handle("veritasium".to_string())
        );
    }

    #[test]
    fn test_parse_trailing_segment_as_query() {
        assert_eq!(
            ChannelRef::parse("https://www.youtube.com/c/veritasium"),
            ChannelRef::Query("veritasium".to_string())
        );
    }

    #[test]
    fn test_parse_free_text_query() {
        assert_eq!(
            ChannelRef::parse("veritasium science"),
            ChannelRef::Query("veritasium science".to_string())
        );
    }

    #[test]
    fn test_parse_schemeless_handle_url() {
        assert_eq!(
            ChannelRef::parse("youtube.com/@veritasium"),
            ChannelRef::Handle("veritasium".to_string())
        );
    }

    fn page(ids: &[&str], next_page_token: Option<&str>) -> SearchResponse {
        SearchResponse {
            items: ids
                .iter()
                .map(|id| SearchItem {
                    id: Some(SearchItemId {
                        video_id: Some(id.to_string()),
                    }),
                    snippet: None,
                })
                .collect(),
            next_page_token: next_page_token.map(String::from),
        }
    }

    #[test]
    fn test_page_request_size() {
        assert_eq!(page_request_size(0, 10), 10);
        assert_eq!(page_request_size(7, 10), 3);
        // Never request more than the API allows per page.
        assert_eq!(page_request_size(0, 200), 50);
        assert_eq!(page_request_size(60, 200), 50);
    }

    #[test]
    fn test_accumulate_threads_page_tokens() {
        let mut ids = Vec::new();

        let token = accumulate_page(&mut ids, page(&["v1", "v2"], Some("tok-1")), 10);
        assert_eq!(token.as_deref(), Some("tok-1"));

        let token = accumulate_page(&mut ids, page(&["v3"], Some("tok-2")), 10);
        assert_eq!(token.as_deref(), Some("tok-2"));
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn test_accumulate_stops_at_limit_mid_page() {
        let mut ids = Vec::new();
        let token = accumulate_page(&mut ids, page(&["v1", "v2", "v3", "v4"], Some("tok")), 3);

        // Limit reached mid-page: excess items dropped, no further pages.
        assert_eq!(token, None);
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn test_accumulate_exhausted_tokens_end_listing() {
        let mut ids = Vec::new();
        let token = accumulate_page(&mut ids, page(&["v1"], None), 10);

        // Short channel: fewer results than requested is not an error.
        assert_eq!(token, None);
        assert_eq!(ids, vec!["v1"]);
    }

    #[test]
    fn test_accumulate_skips_items_without_video_id() {
        let mut ids = Vec::new();
        let mut response = page(&["v1"], None);
        response.items.push(SearchItem {
            id: None,
            snippet: None,
        });
        response.items.push(SearchItem {
            id: Some(SearchItemId { video_id: None }),
            snippet: None,
        });

        accumulate_page(&mut ids, response, 10);
        assert_eq!(ids, vec!["v1"]);
    }
}
