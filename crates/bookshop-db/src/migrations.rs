//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary, so a
//! fresh till creates its own schema on first start.
//!
//! ```text
//! 001_initial_schema.sql
//!   books            catalog, stock, status
//!   bills            headers with stored totals
//!   bill_items       line snapshots (FK bills, books)
//!   bill_sequences   per-day bill number counter
//!   stock_movements  one row per applied stock change
//! ```
//!
//! Applied files are checksummed in `_sqlx_migrations`. Change the schema by
//! adding `NNN_description.sql`, never by editing an applied file.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever has not been applied yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

/// `(embedded, applied)`. A database that never ran a migration reports 0 applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if tracked == 0 {
        return Ok((embedded, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await?;

    Ok((embedded, applied as usize))
}
