//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::embedding::OpenAIEmbedder;
use crate::knowledge_base::KnowledgeBase;
use crate::rag::{AnswerGenerator, ContextBuilder, TwinChat};
use crate::twin::TwinStore;
use crate::websearch::WebSearchClient;
use anyhow::Result;
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;

/// Build a chat session for a twin from settings.
pub(super) fn build_session(
    settings: &Settings,
    twin_id: &str,
    max_chunks: Option<usize>,
) -> Result<TwinChat> {
    let store = TwinStore::new(&settings.twins_dir());
    let twin = store.load(twin_id)?;

    let kb_path = store.knowledge_base_path(twin_id);
    let knowledge_base = if kb_path.exists() {
        KnowledgeBase::load(&kb_path)?
    } else {
        Output::warning(&format!(
            "Twin '{}' has no knowledge base yet; answering without context.",
            twin_id
        ));
        KnowledgeBase::default()
    };

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let embedder = Arc::new(OpenAIEmbedder::new(settings));
    let context_builder = ContextBuilder::new(knowledge_base, embedder)
        .with_max_chunks(max_chunks.unwrap_or(settings.chat.max_context_chunks))
        .with_web_search(WebSearchClient::from_settings(settings));

    let generator = AnswerGenerator::new(settings, prompts);
    Ok(TwinChat::new(
        generator,
        context_builder,
        twin,
        settings.chat.max_history_turns,
    ))
}

/// Run the ask command.
pub async fn run_ask(
    twin: &str,
    question: &str,
    max_chunks: Option<usize>,
    show_sources: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'stemme doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut session = build_session(&settings, twin, max_chunks)?;
    let mut stream = session.send(question).await?;

    let mut answer = String::new();
    let mut stdout = std::io::stdout();
    println!();
    while let Some(fragment) = stream.next().await {
        match fragment {
            Ok(text) => {
                print!("{}", text);
                stdout.flush()?;
                answer.push_str(&text);
            }
            Err(e) => {
                // Mid-stream failures end the answer; what streamed stays.
                println!();
                Output::error(&format!("Answer stream ended early: {}", e));
                break;
            }
        }
    }
    println!("\n");
    session.record_answer(&answer);

    if show_sources {
        Output::header("Sources");
        let context = session.last_context();
        if context.passages.is_empty() {
            Output::info("No passages retrieved.");
        } else {
            for ranked in &context.passages {
                Output::source(&ranked.passage.video_id, ranked.score, &ranked.passage.text);
            }
        }
    }

    Ok(())
}
