//! Configuration module for Stemme.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{PersonaPrompts, Prompts};
pub use settings::{
    ApiSettings, ChatSettings, ChunkingSettings, EmbeddingSettings, GeneralSettings,
    IngestSettings, PromptSettings, Settings, WebSearchSettings, YoutubeSettings,
};
