//! Init command implementation.

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the init command: create directories and a default config file.
pub fn run_init(settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.twins_dir())?;
    Output::success(&format!("Data directory: {}", settings.data_dir().display()));

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config already exists: {}", config_path.display()));
    } else {
        settings.save_to(&config_path)?;
        Output::success(&format!("Wrote default config: {}", config_path.display()));
    }

    Output::header("Next steps");
    Output::list_item("export TOGETHER_API_KEY='...' (or OPENAI_API_KEY for another endpoint)");
    Output::list_item("export YOUTUBE_API_KEY='...' (YouTube Data API v3)");
    Output::list_item("export TAVILY_API_KEY='...' (optional, enables web search)");
    Output::list_item("stemme ingest <twin> <channel> to build your first twin");

    Ok(())
}
