//! Configuration settings for Stemme.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub api: ApiSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub youtube: YoutubeSettings,
    pub ingest: IngestSettings,
    pub chat: ChatSettings,
    pub websearch: WebSearchSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing twin data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.stemme".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// OpenAI-compatible API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL for the OpenAI-compatible API.
    pub base_url: String,
    /// API key. Environment variables take precedence; see `Settings::api_key`.
    pub api_key: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.together.xyz/v1".to_string(),
            api_key: None,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use. Dimensionality is a property of the model
    /// and is never configured separately.
    pub model: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "togethercomputer/m2-bert-80M-8k-retrieval".to_string(),
        }
    }
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Window size in characters.
    pub size: usize,
    /// Overlap between consecutive windows in characters.
    pub overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            size: 1000,
            overlap: 200,
        }
    }
}

/// YouTube Data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// YouTube Data API v3 key. `YOUTUBE_API_KEY` takes precedence.
    pub api_key: Option<String>,
    /// Transcript language code.
    pub transcript_language: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            transcript_language: "en".to_string(),
        }
    }
}

/// Ingestion pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Default number of videos to ingest when no limit is given.
    pub default_limit: usize,
    /// Hard upper bound on videos per ingestion run (bounds API cost).
    pub max_videos: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_videos: 50,
        }
    }
}

/// Chat / answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// LLM model for answer generation.
    pub model: String,
    /// Maximum number of context passages to include.
    pub max_context_chunks: usize,
    /// Maximum conversation turns kept in chat history.
    pub max_history_turns: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo".to_string(),
            max_context_chunks: 5,
            max_history_turns: 20,
        }
    }
}

/// Web search augmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchSettings {
    /// Tavily API key. `TAVILY_API_KEY` takes precedence. Absent key
    /// disables web search entirely.
    pub api_key: Option<String>,
    /// Maximum results to request per search.
    pub max_results: usize,
}

impl Default for WebSearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            max_results: 5,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::StemmeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stemme")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Directory holding all twins.
    pub fn twins_dir(&self) -> PathBuf {
        self.data_dir().join("twins")
    }

    /// OpenAI-compatible API key: `TOGETHER_API_KEY`, then
    /// `OPENAI_API_KEY`, then the config value.
    pub fn api_key(&self) -> Option<String> {
        env_nonempty("TOGETHER_API_KEY")
            .or_else(|| env_nonempty("OPENAI_API_KEY"))
            .or_else(|| self.api.api_key.clone())
    }

    /// YouTube Data API key: `YOUTUBE_API_KEY`, then the config value.
    pub fn youtube_api_key(&self) -> Option<String> {
        env_nonempty("YOUTUBE_API_KEY").or_else(|| self.youtube.api_key.clone())
    }

    /// Tavily API key: `TAVILY_API_KEY`, then the config value.
    pub fn tavily_api_key(&self) -> Option<String> {
        env_nonempty("TAVILY_API_KEY").or_else(|| self.websearch.api_key.clone())
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.size, 1000);
        assert_eq!(settings.chunking.overlap, 200);
        assert_eq!(settings.ingest.max_videos, 50);
        assert_eq!(settings.chat.max_context_chunks, 5);
        assert!(settings.api.base_url.contains("together"));
    }

    #[test]
    fn test_partial_config_parses() {
        let settings: Settings = toml::from_str(
            r#"
            [chat]
            model = "some-other-model"
            "#,
        )
        .unwrap();
        assert_eq!(settings.chat.model, "some-other-model");
        assert_eq!(settings.chat.max_context_chunks, 5);
    }
}
