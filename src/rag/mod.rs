//! RAG (Retrieval-Augmented Generation) for answering in a twin's voice.
//!
//! The query path: embed the question, rank stored passages, assemble a
//! bounded context (optionally augmented with live web search), then stream
//! a persona-driven completion.

pub mod context;
mod answer;

pub use answer::{AnswerGenerator, AnswerStream, TwinChat};
pub use context::{AssembledContext, ContextBuilder};

use serde::{Deserialize, Serialize};

/// Speaker role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a chat conversation. The last user turn drives retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }
}
