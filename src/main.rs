//! Stemme CLI entry point.

use anyhow::Result;
use clap::Parser;
use stemme::cli::{commands, Cli, Commands};
use stemme::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("stemme={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure data directories exist
    std::fs::create_dir_all(settings.twins_dir())?;

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Ingest {
            twin,
            channel,
            limit,
            title,
            description,
        } => {
            commands::run_ingest(twin, channel, *limit, title.clone(), description.clone(), settings)
                .await?;
        }

        Commands::Ask {
            twin,
            question,
            max_chunks,
            sources,
        } => {
            commands::run_ask(twin, question, *max_chunks, *sources, settings).await?;
        }

        Commands::Chat { twin } => {
            commands::run_chat(twin, settings).await?;
        }

        Commands::List => {
            commands::run_list(settings)?;
        }

        Commands::Status { twin } => {
            commands::run_status(twin, settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
