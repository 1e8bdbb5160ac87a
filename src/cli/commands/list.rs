//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::twin::TwinStore;
use anyhow::Result;

/// Run the list command.
pub fn run_list(settings: Settings) -> Result<()> {
    let store = TwinStore::new(&settings.twins_dir());
    let twins = store.list()?;

    if twins.is_empty() {
        Output::info("No twins yet. Run 'stemme ingest <twin> <channel>' to create one.");
        return Ok(());
    }

    Output::header("Twins");
    for twin in &twins {
        Output::twin_info(&twin.id, &twin.title, twin.passage_count, twin.video_count);
    }

    Ok(())
}
