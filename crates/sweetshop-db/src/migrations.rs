//! # Schema Migrations
//!
//! SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied on every [`Database::new`](crate::Database::new). sqlx records
//! each applied file (with checksum) in `_sqlx_migrations`, so reopening an
//! up-to-date database is a no-op.
//!
//! ```text
//! 001_initial_schema.sql   items (quantity CHECK >= 0), accounts (email UNIQUE)
//! 002_item_name_key.sql    items.name_key, Unicode-folded name for search
//! ```
//!
//! New schema changes go in a new `NNN_description.sql`; applied files are
//! never edited.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying pending migrations");
    MIGRATOR.run(pool).await?;
    info!("Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((MIGRATOR.migrations.len(), applied as usize))
}
