//! Access to the Synology auto-block database.
//!
//! The `AutoBlockIP` schema is owned by DSM; this tool refuses to create it
//! and fails fast when the database file is absent or unreadable. All
//! mutations of a run are issued within a single transaction committed once
//! at the end.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::SynoblockError;
use crate::normalizer::NormalizedEntry;

/// Toggles for one reconciliation pass. All compose independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Delete deny entries whose expiration has passed.
    pub remove_expired: bool,
    /// Delete every deny entry before inserting.
    pub clear_all: bool,
    /// Suppress every mutation; read-only steps still run.
    pub dry_run: bool,
}

/// Deny-row counts around the upsert step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub before: i64,
    pub after: i64,
}

impl ReconcileReport {
    pub fn added(&self) -> i64 {
        self.after - self.before
    }
}

/// Handle on the deny-list store.
#[derive(Clone)]
pub struct DenyStore {
    pool: SqlitePool,
}

impl DenyStore {
    /// Connection acquire timeout - prevents a locked database from blocking
    /// indefinitely.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Open the existing database. A missing file is a fatal startup error;
    /// the schema is never created here.
    pub async fn open(path: &Path, read_only: bool) -> Result<Self, SynoblockError> {
        if !path.is_file() {
            return Err(SynoblockError::Database(format!(
                "no such database file: {}",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(read_only)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| {
                SynoblockError::Database(format!("unable to open {}: {}", path.display(), e))
            })?;

        debug!("Database connected: {}", path.display());
        Ok(Self { pool })
    }

    /// Apply normalized entries against the store: optional expired-entry
    /// purge, optional full clear, then replace-by-key upsert, all within one
    /// transaction.
    ///
    /// Upserts are keyed by the raw address (`IP` primary key): a reappearing
    /// address has its previous `ExpireTime`/`RecordTime` overwritten, not
    /// merged. Returns `None` when the entry list is empty, in which case the
    /// purge and clear steps still ran but the counting and upsert steps were
    /// skipped.
    pub async fn reconcile(
        &self,
        entries: &[NormalizedEntry],
        opts: ReconcileOptions,
        now: i64,
    ) -> Result<Option<ReconcileReport>, SynoblockError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        if opts.remove_expired && !opts.dry_run {
            let purged = sqlx::query(
                "DELETE FROM AutoBlockIP WHERE Deny = 1 AND ExpireTime > 0 AND ExpireTime < ?",
            )
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();
            info!("Removed {} expired deny entries", purged);
        }

        if opts.clear_all && !opts.dry_run {
            let cleared = sqlx::query("DELETE FROM AutoBlockIP WHERE Deny = 1")
                .execute(&mut *tx)
                .await
                .map_err(db_err)?
                .rows_affected();
            info!("Removed all {} deny entries", cleared);
        }

        if entries.is_empty() {
            info!("No IP found in list");
            tx.commit().await.map_err(db_err)?;
            return Ok(None);
        }

        let before = count_deny(&mut tx).await?;

        if opts.dry_run {
            info!("Dry run -> nothing to do");
        } else {
            for entry in entries {
                // Address family with no standard form, never persisted.
                if entry.canonical.is_empty() {
                    continue;
                }
                sqlx::query(
                    "INSERT OR REPLACE INTO AutoBlockIP \
                     (IP, IPStd, ExpireTime, Deny, RecordTime, Type, Meta) \
                     VALUES (?, ?, ?, 1, ?, 0, NULL)",
                )
                .bind(&entry.address)
                .bind(&entry.canonical)
                .bind(entry.expire_at)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }
        }

        let after = count_deny(&mut tx).await?;
        tx.commit().await.map_err(db_err)?;

        Ok(Some(ReconcileReport { before, after }))
    }

    /// Current number of deny rows, outside any reconciliation pass.
    pub async fn deny_count(&self) -> Result<i64, SynoblockError> {
        sqlx::query_scalar("SELECT COUNT(IP) FROM AutoBlockIP WHERE Deny = 1")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    /// Close the underlying pool. Dropping the store closes it too; tests use
    /// this to release the file before reopening.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn count_deny(tx: &mut Transaction<'_, Sqlite>) -> Result<i64, SynoblockError> {
    sqlx::query_scalar("SELECT COUNT(IP) FROM AutoBlockIP WHERE Deny = 1")
        .fetch_one(&mut **tx)
        .await
        .map_err(db_err)
}

fn db_err(e: sqlx::Error) -> SynoblockError {
    SynoblockError::Database(e.to_string())
}
