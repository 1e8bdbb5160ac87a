//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials are available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, StemmeError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Ingestion requires the YouTube Data API and the embedding API.
    Ingest,
    /// Asking questions requires the embedding/completion API.
    Ask,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ingest => {
            check_api_key(settings)?;
            check_youtube_key(settings)?;
        }
        Operation::Ask => {
            check_api_key(settings)?;
        }
    }
    Ok(())
}

/// Check that an OpenAI-compatible API key is configured.
fn check_api_key(settings: &Settings) -> Result<()> {
    if settings.api_key().is_some() {
        Ok(())
    } else {
        Err(StemmeError::Config(
            "No API key configured. Set it with: export TOGETHER_API_KEY='...'".to_string(),
        ))
    }
}

/// Check that a YouTube Data API key is configured.
fn check_youtube_key(settings: &Settings) -> Result<()> {
    if settings.youtube_api_key().is_some() {
        Ok(())
    } else {
        Err(StemmeError::Config(
            "YOUTUBE_API_KEY not set. Create a YouTube Data API v3 key and set it with: \
             export YOUTUBE_API_KEY='...'"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_keys_satisfy_checks() {
        let mut settings = Settings::default();
        settings.api.api_key = Some("key".to_string());
        settings.youtube.api_key = Some("yt".to_string());
        settings.websearch.api_key = Some("tv".to_string());

        // Env vars may also satisfy these in CI; config keys are enough.
        assert!(check(Operation::Ingest, &settings).is_ok());
        assert!(check(Operation::Ask, &settings).is_ok());
    }
}
