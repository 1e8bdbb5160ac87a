//! Doctor command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::twin::TwinStore;
use anyhow::Result;
use console::style;

/// Run the doctor command: report credential and storage state.
pub fn run_doctor(settings: &Settings) -> Result<()> {
    Output::header("Credentials");
    check(
        "OpenAI-compatible API key (TOGETHER_API_KEY / OPENAI_API_KEY)",
        settings.api_key().is_some(),
        true,
    );
    check(
        "YouTube Data API key (YOUTUBE_API_KEY)",
        settings.youtube_api_key().is_some(),
        true,
    );
    check(
        "Tavily API key (TAVILY_API_KEY)",
        settings.tavily_api_key().is_some(),
        false,
    );

    Output::header("Configuration");
    Output::kv("Config path", &Settings::default_config_path().display().to_string());
    Output::kv("Data directory", &settings.data_dir().display().to_string());
    Output::kv("API base URL", &settings.api.base_url);
    Output::kv("Embedding model", &settings.embedding.model);
    Output::kv("Chat model", &settings.chat.model);

    Output::header("Twins");
    let store = TwinStore::new(&settings.twins_dir());
    let twins = store.list()?;
    if twins.is_empty() {
        Output::info("No twins stored yet.");
    } else {
        for twin in &twins {
            Output::twin_info(&twin.id, &twin.title, twin.passage_count, twin.video_count);
        }
    }

    Ok(())
}

fn check(label: &str, ok: bool, required: bool) {
    if ok {
        println!("  {} {}", style("✓").green(), label);
    } else if required {
        println!("  {} {} {}", style("✗").red(), label, style("(required)").dim());
    } else {
        println!(
            "  {} {} {}",
            style("-").yellow(),
            label,
            style("(optional, web search disabled)").dim()
        );
    }
}
