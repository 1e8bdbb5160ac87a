//! Streamed answer generation in a twin's voice.

use super::context::{AssembledContext, ContextBuilder};
use super::{ConversationTurn, Role};
use crate::config::{Prompts, Settings};
use crate::error::{Result, StemmeError};
use crate::openai::create_client;
use crate::twin::TwinMetadata;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::pin::Pin;
use tracing::{debug, instrument};

/// A stream of answer text fragments.
///
/// Dropping the stream cancels the underlying request, so a disconnected
/// caller holds no resources. A mid-stream upstream error terminates the
/// stream with one final `Err` item; there is no retry or replay.
pub type AnswerStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Generates persona-driven completions from assembled context.
pub struct AnswerGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompts: Prompts,
}

impl AnswerGenerator {
    /// Create a generator for the configured chat model.
    pub fn new(settings: &Settings, prompts: Prompts) -> Self {
        Self {
            client: create_client(settings),
            model: settings.chat.model.clone(),
            prompts,
        }
    }

    /// Build the persona system prompt for a twin and context.
    fn system_prompt(&self, twin: &TwinMetadata, context: &AssembledContext) -> String {
        let mut vars = HashMap::new();
        vars.insert("title".to_string(), twin.title.clone());
        vars.insert("description".to_string(), twin.description.clone());
        vars.insert("context".to_string(), context.context_block.clone());
        vars.insert("web".to_string(), context.web_block.clone());
        self.prompts
            .render_with_custom(&self.prompts.persona.system, &vars)
    }

    /// Stream a completion for the conversation, token-chunk by token-chunk.
    #[instrument(skip(self, twin, history, context), fields(twin = %twin.id))]
    pub async fn stream_answer(
        &self,
        twin: &TwinMetadata,
        history: &[ConversationTurn],
        context: &AssembledContext,
    ) -> Result<AnswerStream> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt(twin, context))
                .build()
                .map_err(|e| StemmeError::Chat(e.to_string()))?
                .into(),
        ];
        for turn in history {
            messages.push(to_request_message(turn)?);
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .stream(true)
            .build()
            .map_err(|e| StemmeError::Chat(e.to_string()))?;

        debug!("Streaming completion with {} turns of history", history.len());

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| StemmeError::OpenAI(format!("Failed to start completion: {}", e)))?;

        let mapped = stream.filter_map(|chunk| async move {
            match chunk {
                Ok(response) => response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.delta.content)
                    .filter(|s| !s.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(StemmeError::OpenAI(format!("Stream error: {}", e)))),
            }
        });

        Ok(Box::pin(mapped))
    }
}

fn to_request_message(turn: &ConversationTurn) -> Result<ChatCompletionRequestMessage> {
    let message = match turn.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(turn.content.clone())
            .build()
            .map_err(|e| StemmeError::Chat(e.to_string()))?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(turn.content.clone())
            .build()
            .map_err(|e| StemmeError::Chat(e.to_string()))?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(turn.content.clone())
            .build()
            .map_err(|e| StemmeError::Chat(e.to_string()))?
            .into(),
    };
    Ok(message)
}

/// A chat session with one twin: context assembly, history, and streaming.
pub struct TwinChat {
    generator: AnswerGenerator,
    context_builder: ContextBuilder,
    twin: TwinMetadata,
    history: Vec<ConversationTurn>,
    last_context: AssembledContext,
    max_history_turns: usize,
}

impl TwinChat {
    /// Create a session for a twin.
    pub fn new(
        generator: AnswerGenerator,
        context_builder: ContextBuilder,
        twin: TwinMetadata,
        max_history_turns: usize,
    ) -> Self {
        Self {
            generator,
            context_builder,
            twin,
            history: Vec::new(),
            last_context: AssembledContext::default(),
            max_history_turns,
        }
    }

    /// The twin this session speaks as.
    pub fn twin(&self) -> &TwinMetadata {
        &self.twin
    }

    /// The context assembled for the most recent `send`.
    pub fn last_context(&self) -> &AssembledContext {
        &self.last_context
    }

    /// Send a user message and stream the twin's answer.
    ///
    /// The caller consumes the stream and reports the collected answer back
    /// via `record_answer` so follow-up turns see it.
    pub async fn send(&mut self, message: &str) -> Result<AnswerStream> {
        self.history.push(ConversationTurn::user(message));
        self.trim_history();

        let context = self.context_builder.assemble(message).await?;
        let stream = self
            .generator
            .stream_answer(&self.twin, &self.history, &context)
            .await?;
        self.last_context = context;
        Ok(stream)
    }

    /// Record the twin's completed answer in the conversation history.
    pub fn record_answer(&mut self, answer: &str) {
        self.history.push(ConversationTurn::assistant(answer));
        self.trim_history();
    }

    /// Clear conversation history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn trim_history(&mut self) {
        if self.history.len() > self.max_history_turns {
            let excess = self.history.len() - self.max_history_turns;
            self.history.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twin() -> TwinMetadata {
        TwinMetadata::new("demo", "Demo Creator", "Talks about testing", "@demo")
    }

    #[test]
    fn test_system_prompt_embeds_persona_and_context() {
        let generator = AnswerGenerator::new(&Settings::default(), Prompts::default());
        let context = AssembledContext {
            passages: Vec::new(),
            context_block: "\n\nContext from the channel:\nsome passage".to_string(),
            web_block: "\n\nCurrent web information:\n[1] t: c".to_string(),
        };

        let prompt = generator.system_prompt(&twin(), &context);
        assert!(prompt.contains("You are Demo Creator"));
        assert!(prompt.contains("Talks about testing"));
        assert!(prompt.contains("Context from the channel:\nsome passage"));
        assert!(prompt.contains("Current web information:"));
        assert!(prompt.contains("politely decline"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_history_trimming() {
        let generator = AnswerGenerator::new(&Settings::default(), Prompts::default());
        let builder = ContextBuilder::new(
            crate::knowledge_base::KnowledgeBase::default(),
            std::sync::Arc::new(NoopEmbedder),
        );
        let mut chat = TwinChat::new(generator, builder, twin(), 4);

        for i in 0..6 {
            chat.history.push(ConversationTurn::user(&format!("q{}", i)));
            chat.record_answer(&format!("a{}", i));
        }

        assert_eq!(chat.history.len(), 4);
        // Oldest turns dropped, newest kept.
        assert_eq!(chat.history.last().unwrap().content, "a5");
    }

    struct NoopEmbedder;

    #[async_trait::async_trait]
    impl crate::embedding::Embedder for NoopEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0])
        }
    }
}
