//! Error types for Stemme.

use thiserror::Error;

/// Library-level error type for Stemme operations.
#[derive(Error, Debug)]
pub enum StemmeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel not found: {0}")]
    SourceNotFound(String),

    #[error("No transcript available for video {0}")]
    NoTranscript(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Ingestion produced no passages; existing knowledge base left untouched")]
    EmptyKnowledgeBase,

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Stemme operations.
pub type Result<T> = std::result::Result<T, StemmeError>;
