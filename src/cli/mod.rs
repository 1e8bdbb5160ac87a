//! CLI module for Stemme.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Stemme - YouTube Channel Twins with RAG
///
/// A local-first CLI tool for building a knowledge base from a YouTube
/// channel's transcripts and chatting with a twin of the creator.
/// The name "Stemme" comes from the Norwegian word for "voice."
#[derive(Parser, Debug)]
#[command(name = "stemme")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Stemme and write a default configuration
    Init,

    /// Check credentials and configuration
    Doctor,

    /// Build or rebuild a twin's knowledge base from a channel
    Ingest {
        /// Twin ID to create or rebuild
        twin: String,

        /// Channel URL, @handle, or channel name to search for
        channel: String,

        /// Maximum number of videos to ingest (clamped to the configured cap)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Creator title used as the persona's name
        #[arg(long)]
        title: Option<String>,

        /// Persona description used in the system prompt
        #[arg(long)]
        description: Option<String>,
    },

    /// Ask a twin a single question
    Ask {
        /// Twin ID to ask
        twin: String,

        /// The question to ask
        question: String,

        /// Maximum number of context passages to include
        #[arg(short = 'c', long)]
        max_chunks: Option<usize>,

        /// Show the retrieved source passages after the answer
        #[arg(long)]
        sources: bool,
    },

    /// Start an interactive chat session with a twin
    Chat {
        /// Twin ID to chat with
        twin: String,
    },

    /// List stored twins
    List,

    /// Show a twin's knowledge base status
    Status {
        /// Twin ID
        twin: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
