//! One ingestion pass: read sources, normalize, stamp, reconcile.

use anyhow::Result;
use chrono::Utc;
use std::time::Instant;
use tracing::info;

use crate::backup::backup_database;
use crate::cli::Cli;
use crate::db::{DenyStore, ReconcileOptions};
use crate::expiry::expire_at;
use crate::fetcher::Fetcher;
use crate::normalizer::{normalize, tokenize};

/// Run a full update pass against the auto-block database.
pub async fn run(cli: &Cli) -> Result<()> {
    let started = Instant::now();
    let run_start = Utc::now().timestamp();

    // Configuration errors are rejected before any network or store access.
    cli.validate()?;

    // Fail fast when the database is absent; the schema belongs to DSM.
    let store = DenyStore::open(&cli.database, cli.dry_run).await?;

    if let Some(dir) = &cli.backup_to {
        backup_database(&cli.database, dir)?;
    }

    let expire = expire_at(cli.expire_in_day, run_start);

    let fetcher = Fetcher::new()?;
    let outcomes = fetcher.fetch_all(&cli.in_file, &cli.in_url).await;

    let texts: Vec<&str> = outcomes.iter().map(|o| o.text()).collect();
    let tokens = tokenize(&texts);
    let (entries, invalid) = normalize(&tokens, expire);

    info!("Total IP fetched in lists: {}", entries.len());
    if !invalid.is_empty() {
        info!(
            "Ignored {} invalid entries: {}",
            invalid.len(),
            invalid.join(", ")
        );
    }

    let opts = ReconcileOptions {
        remove_expired: cli.remove_expired,
        clear_all: cli.clear_db,
        dry_run: cli.dry_run,
    };
    let report = store.reconcile(&entries, opts, Utc::now().timestamp()).await?;

    if let Some(report) = report {
        info!("Total deny IP currently in the database: {}", report.before);
        info!(
            "Total deny IP now in the database: {} ({} added)",
            report.after,
            report.added()
        );
    }

    info!("Elapsed time: {:.2} seconds", started.elapsed().as_secs_f64());
    Ok(())
}
