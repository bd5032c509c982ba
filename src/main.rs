//! FORMBOOK — Season Simulation & Ranking Engine
//!
//! Entry point. Loads configuration, initialises structured logging, then
//! replays every configured tournament's season history into fresh rating
//! and standings snapshots for the strategy scripts to consume.

use anyhow::Result;
use tracing::info;

use formbook::config::AppConfig;
use formbook::data::{FixtureFileSource, MatchDataSource};
use formbook::engine::processor::SeasonProcessor;
use formbook::storage::JsonSnapshotStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;
    init_logging();

    let source = FixtureFileSource::new(cfg.engine.data_dir.as_str());
    let store = JsonSnapshotStore::new(cfg.engine.snapshot_dir.as_str());

    info!(
        tournaments = cfg.tournaments.len(),
        source = source.name(),
        data_dir = %cfg.engine.data_dir,
        snapshot_dir = %cfg.engine.snapshot_dir,
        "formbook starting"
    );

    let processor = SeasonProcessor::new(source, store);
    let reports = processor.process_all(&cfg.tournaments).await;

    for report in &reports {
        info!(
            tournament = %report.tournament_name,
            season = %report.season_id,
            weeks = report.weeks_replayed,
            matches = report.matches_replayed,
            skipped = report.matches_skipped,
            leader = report.leader.as_deref().unwrap_or("-"),
            "Season snapshot written"
        );
    }

    info!(
        processed = reports.len(),
        configured = cfg.tournaments.len(),
        "formbook finished"
    );
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("formbook=info"));

    if std::env::var("FORMBOOK_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
