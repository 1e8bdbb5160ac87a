//! Status command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::knowledge_base::KnowledgeBase;
use crate::twin::TwinStore;
use anyhow::Result;

/// Run the status command: report a twin's knowledge base state.
pub fn run_status(twin_id: &str, settings: Settings) -> Result<()> {
    let store = TwinStore::new(&settings.twins_dir());
    let twin = store.load(twin_id)?;

    Output::header(&twin.title);
    Output::kv("Twin ID", &twin.id);
    Output::kv("Channel", &twin.channel_url);
    if !twin.description.is_empty() {
        Output::kv("Description", &twin.description);
    }

    let kb_path = store.knowledge_base_path(twin_id);
    if !kb_path.exists() {
        Output::kv("Knowledge base", "not built");
        return Ok(());
    }

    // Counts come from the file itself, not the metadata snapshot.
    let kb = KnowledgeBase::load(&kb_path)?;
    Output::kv("Passages", &kb.len().to_string());
    Output::kv("Videos", &kb.video_count().to_string());
    match &twin.trained_at {
        Some(at) => Output::kv("Last trained", &at.to_rfc3339()),
        None => Output::kv("Last trained", "unknown"),
    }

    Ok(())
}
