//! OpenAI-compatible client configuration with sensible defaults.
//!
//! Stemme talks to Together AI through its OpenAI-compatible API, so the
//! same client serves both embeddings and chat completions.

use crate::config::Settings;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for the configured OpenAI-compatible endpoint.
///
/// Uses a 5-minute timeout by default to prevent hung API calls. The API
/// key resolves from `TOGETHER_API_KEY`, then `OPENAI_API_KEY`.
pub fn create_client(settings: &Settings) -> Client<OpenAIConfig> {
    create_client_with_timeout(settings, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create a client with a custom timeout.
pub fn create_client_with_timeout(settings: &Settings, timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    let mut config = OpenAIConfig::new().with_api_base(&settings.api.base_url);
    if let Some(key) = settings.api_key() {
        config = config.with_api_key(key);
    }

    Client::with_config(config).with_http_client(http_client)
}
