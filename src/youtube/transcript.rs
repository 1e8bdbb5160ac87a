//! Transcript retrieval through YouTube's public timedtext endpoint.

use crate::error::{Result, StemmeError};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument};

const TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";

fn text_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?text[^>]*>").expect("Invalid regex"))
}

/// Fetches spoken-word transcripts for individual videos.
///
/// Many videos have no captions in the requested language; callers are
/// expected to treat `NoTranscript` as skip-and-continue, not a hard stop.
pub struct TranscriptFetcher {
    http: reqwest::Client,
    language: String,
}

impl TranscriptFetcher {
    /// Create a fetcher for the given caption language code.
    pub fn new(language: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            language: language.to_string(),
        }
    }

    /// Fetch the full transcript text for a video.
    ///
    /// Fails with `NoTranscript` when the endpoint returns a non-success
    /// status, an empty body, or markup that strips down to nothing. No
    /// retries: a failed video is a permanent skip within one run.
    #[instrument(skip(self))]
    pub async fn fetch(&self, video_id: &str) -> Result<String> {
        let response = self
            .http
            .get(TIMEDTEXT_URL)
            .query(&[("lang", self.language.as_str()), ("v", video_id)])
            .send()
            .await
            .map_err(|e| StemmeError::NoTranscript(format!("{}: {}", video_id, e)))?;

        if !response.status().is_success() {
            return Err(StemmeError::NoTranscript(video_id.to_string()));
        }

        let xml = response
            .text()
            .await
            .map_err(|e| StemmeError::NoTranscript(format!("{}: {}", video_id, e)))?;

        let text = strip_timedtext_markup(&xml);
        if text.is_empty() {
            return Err(StemmeError::NoTranscript(video_id.to_string()));
        }

        debug!("Fetched transcript for {} ({} chars)", video_id, text.len());
        Ok(text)
    }
}

/// Reduce timedtext XML to plain transcript text.
///
/// Replaces `<text>` tags with line breaks and decodes the basic entities
/// the endpoint emits. Not a general XML parser; the timedtext format is a
/// flat list of caption elements.
fn strip_timedtext_markup(xml: &str) -> String {
    let without_tags = text_tag_regex().replace_all(xml, "\n");
    let lines: Vec<String> = without_tags
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('<'))
        .map(|line| {
            line.replace("&amp;", "&")
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
                .replace("&#39;", "'")
        })
        .collect();

    lines.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<transcript>
<text start="0.0" dur="2.5">hello there</text>
<text start="2.5" dur="3.0">it&#39;s a &quot;test&quot; &amp; more</text>
</transcript>"#;
        let text = strip_timedtext_markup(xml);
        assert_eq!(text, "hello there it's a \"test\" & more");
    }

    #[test]
    fn test_strip_markup_empty_transcript() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?><transcript></transcript>"#;
        assert_eq!(strip_timedtext_markup(xml), "");
    }

    #[test]
    fn test_strip_markup_empty_input() {
        assert_eq!(strip_timedtext_markup(""), "");
    }
}
