//! CLI commands for mma-odds-scraper.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::ingest::{CancelFlag, IngestSettings, Ingestor, RunSummary};
use crate::scraper::{self, HttpTransport, RateLimiter};
use crate::storage::DatasetStore;

#[derive(Parser)]
#[command(name = "mma-odds-scraper")]
#[command(version, about = "Scrape historical MMA closing odds and label upsets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch events not yet in the dataset and append their fights (default)
    Run(RunArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Dataset CSV path override
    #[arg(short, long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// Fetch at most this many new events
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Event pages fetched in parallel
    #[arg(short, long)]
    pub concurrency: Option<usize>,
}

/// Run one ingestion pass.
pub async fn run_ingest(args: RunArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(n) = args.concurrency {
        config.scraper.concurrency = n;
    }
    let dataset_path = dataset_path(&args, &config);

    let scraper_config = &config.scraper;
    let index_url = scraper::index_url(&scraper_config.base_url, &scraper_config.index_path)
        .with_context(|| format!("invalid base URL '{}'", scraper_config.base_url))?;

    let limiter = RateLimiter::new(
        scraper_config.requests_per_minute,
        Duration::from_millis(scraper_config.request_delay_ms),
    );
    let transport = HttpTransport::new(scraper_config, limiter)?;

    let settings = IngestSettings {
        base_url: scraper_config.base_url.clone(),
        index_url,
        concurrency: scraper_config.concurrency.max(1),
        limit: args.limit,
        event_timeout: scraper_config.event_timeout(),
    };
    info!(
        "Dataset {}, concurrency {}",
        dataset_path.display(),
        settings.concurrency
    );

    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted: finishing in-flight events, then saving");
                cancel.cancel();
            }
        });
    }

    let store = DatasetStore::new(dataset_path);
    let summary = Ingestor::new(transport, settings).run(&store, &cancel).await?;

    if summary.persisted {
        info!("Dataset saved to {}", store.path().display());
    }
    print!("{}", format_summary(&summary));
    Ok(())
}

/// `--dataset` wins over the configured path, byte for byte
fn dataset_path(args: &RunArgs, config: &AppConfig) -> PathBuf {
    args.dataset
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.storage.dataset_path))
}

/// Human-readable run summary for stdout
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Successfully scraped {} fights from {} new events",
        summary.new_records, summary.new_events
    );

    if let Some((name, location)) = &summary.last_card {
        match location {
            Some(loc) => {
                let _ = writeln!(out, "Last fight card: {} ({})", name, loc);
            }
            None => {
                let _ = writeln!(out, "Last fight card: {}", name);
            }
        }
    }
    if !summary.failed_events.is_empty() {
        let _ = writeln!(
            out,
            "Failed events (retried next run): {}",
            summary.failed_events.len()
        );
    }
    if !summary.empty_events.is_empty() {
        let _ = writeln!(out, "Events without decided bouts: {}", summary.empty_events.len());
    }
    if summary.cancelled_events > 0 {
        let _ = writeln!(out, "Not fetched (interrupted): {}", summary.cancelled_events);
    }

    let proportions = summary.label_proportions();
    if !proportions.is_empty() {
        let _ = writeln!(out, "Outcome distribution:");
        for (label, share) in proportions {
            let _ = writeln!(out, "  {:<9} {:.3}", label, share);
        }
    }

    out
}
