//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(&settings)?;
            println!("{}", content);
        }
        ConfigAction::Path => {
            Output::info(&format!("{}", Settings::default_config_path().display()));
        }
    }
    Ok(())
}
