//! ostmap-ingest - batch soundtrack ingest binary
//!
//! Runs one batch over a day's box-office ranking: match each ranked
//! movie to a soundtrack in the external catalog, auto-tag, persist.
//! Ctrl-C cancels cleanly: no new items are scheduled and in-flight
//! items finish before the summary prints.

use anyhow::Context;
use chrono::{Duration, Local};
use clap::Parser;
use ostmap_common::ontology::{load_builtin, load_from_path};
use ostmap_common::{config, TagExpander};
use ostmap_ingest::catalog::SpotifyClient;
use ostmap_ingest::feed::KobisClient;
use ostmap_ingest::IngestPipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "ostmap-ingest", version, about = "Soundtrack matching & tagging batch engine")]
struct Args {
    /// Config file path (default: $OSTMAP_CONFIG, then ./ostmap.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Box-office date, YYYYMMDD (default: yesterday)
    #[arg(short, long)]
    target_date: Option<String>,

    /// Ranked movies to ingest (default: from config)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Parallel item workers (default: from config)
    #[arg(short, long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ostmap-ingest");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = config::load(args.config.as_deref())?;

    // The concept graph is load-or-die: the engine is useless without it
    let graph = match &config.ontology_path {
        Some(path) => load_from_path(path)
            .with_context(|| format!("loading ontology from {}", path.display()))?,
        None => load_builtin().context("loading bundled ontology")?,
    };
    info!(
        version = %graph.version(),
        concepts = graph.len(),
        "Concept graph loaded"
    );

    let db_path = config.database_path();
    let pool = ostmap_common::db::init_database_pool(&db_path).await?;
    info!("Database: {}", db_path.display());

    let (client_id, client_secret) = config::resolve_catalog_credentials(&config)?;
    let catalog = Arc::new(SpotifyClient::new(client_id, client_secret, config.market())?);
    let feed = Arc::new(KobisClient::new(config::resolve_feed_api_key(&config)?)?);
    let store = Arc::new(ostmap_common::db::SqliteTrackStore::new(pool));

    let pipeline = IngestPipeline::new(
        feed,
        catalog,
        store,
        TagExpander::new(Arc::new(graph)),
        args.workers.unwrap_or_else(|| config.workers()),
    );

    let target_date = args
        .target_date
        .unwrap_or_else(|| (Local::now() - Duration::days(1)).format("%Y%m%d").to_string());
    let limit = args.limit.unwrap_or_else(|| config.item_limit());

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; finishing in-flight items");
            signal_token.cancel();
        }
    });

    let summary = pipeline.run_batch(&target_date, limit, cancel).await;
    info!(
        target_date = %target_date,
        processed = summary.processed,
        matched = summary.matched,
        no_match = summary.no_match,
        failed = summary.failed,
        tags_assigned = summary.tags_assigned,
        "Run complete"
    );

    Ok(())
}
