//! Stemme - YouTube Channel Twins with RAG
//!
//! A local-first CLI tool for building a searchable knowledge base from a
//! YouTube channel's transcripts and chatting with a "twin" of the creator.
//!
//! The name "Stemme" comes from the Norwegian word for "voice."
//!
//! # Overview
//!
//! Stemme allows you to:
//! - Ingest a YouTube channel's recent videos via their transcripts
//! - Build a per-channel knowledge base of embedded passages
//! - Ask questions and get streamed answers in the creator's voice
//! - Augment answers with live web search for recency-sensitive questions
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `youtube` - Channel resolution, video listing, transcript fetching
//! - `chunking` - Positional transcript chunking
//! - `embedding` - Embedding generation
//! - `knowledge_base` - Persisted passages and similarity ranking
//! - `twin` - Per-channel twin metadata
//! - `ingest` - Ingestion pipeline coordination
//! - `websearch` - Optional live web-search augmentation
//! - `rag` - Context assembly and streamed answer generation
//!
//! # Example
//!
//! ```rust,no_run
//! use stemme::config::Settings;
//! use stemme::ingest::Ingestor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let ingestor = Ingestor::new(&settings)?;
//!
//!     // Build a knowledge base from a channel's 10 most recent videos
//!     let report = ingestor
//!         .build_twin("mytwin", "https://www.youtube.com/@veritasium", Some(10), None, None)
//!         .await?;
//!     println!("Stored {} passages from {} videos", report.passages, report.videos_ingested);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod knowledge_base;
pub mod openai;
pub mod rag;
pub mod twin;
pub mod websearch;
pub mod youtube;

pub use error::{Result, StemmeError};
