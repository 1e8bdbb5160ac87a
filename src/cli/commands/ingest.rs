//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::ingest::Ingestor;
use anyhow::Result;

/// Run the ingest command.
pub async fn run_ingest(
    twin: &str,
    channel: &str,
    limit: Option<usize>,
    title: Option<String>,
    description: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ingest, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'stemme doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let ingestor = Ingestor::new(&settings)?;

    let spinner = Output::spinner(&format!("Ingesting {} into twin '{}'...", channel, twin));
    let result = ingestor
        .build_twin(twin, channel, limit, title.as_deref(), description.as_deref())
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            Output::success(&format!(
                "Built knowledge base for '{}': {} passages from {} of {} videos",
                twin, report.passages, report.videos_ingested, report.videos_listed
            ));
            if report.videos_skipped > 0 {
                Output::warning(&format!(
                    "{} videos skipped (no transcript available)",
                    report.videos_skipped
                ));
            }
            if report.failed_embeddings > 0 {
                Output::warning(&format!(
                    "{} chunks dropped (embedding failed)",
                    report.failed_embeddings
                ));
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            Err(e.into())
        }
    }
}
