use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zipdesk_core::{load_config, validate_config, ClientOutcome, IntakePipeline, ZammadClient};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let json = std::env::var("ZIPDESK_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("ZIPDESK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Helpdesk API: {}", config.api.base_url);
    info!(
        "Folders: source={:?}, processed={:?}, scratch={:?}",
        config.folders.source, config.folders.processed, config.folders.scratch
    );

    let client = ZammadClient::new(&config.api).context("Failed to create helpdesk client")?;

    let run_date = Local::now().date_naive();
    let summary = IntakePipeline::new(&config, &client, run_date)
        .run()
        .await
        .context("Intake run failed")?;

    for report in &summary.clients {
        match &report.outcome {
            ClientOutcome::Done {
                ticket_id,
                attachments,
                note_posted,
                files_moved,
                move_failures,
            } => info!(
                "{}: ticket {} ({} attachment(s), note posted: {}, {} file(s) archived, {} move failure(s))",
                report.client, ticket_id, attachments, note_posted, files_moved, move_failures
            ),
            ClientOutcome::SkippedNoContact { reason }
            | ClientOutcome::SkippedTicketFailed { reason } => warn!(
                "{}: skipped ({}), {} archive(s) left for the next run: {}",
                report.client,
                report.outcome.state(),
                report.archives.len(),
                reason
            ),
        }
    }

    info!(
        "Run complete: {} archive(s) found, {} ticket(s) created, {} client(s) skipped",
        summary.archives_found,
        summary.tickets_created(),
        summary.clients_skipped()
    );

    Ok(())
}
