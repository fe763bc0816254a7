// src/db.rs
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await?;

    // Create the catalog tables on startup
    init_schema(&pool).await?;

    Ok(pool)
}

/// Idempotent schema setup. Ids are AUTOINCREMENT so they are never reused
/// and `ORDER BY id` is insertion order. Timestamps are assigned by the
/// service layer, so the columns carry no SQL defaults. `domain_id` is a
/// plain indexed column, not a declared foreign key: sqlx turns SQLite's
/// foreign_keys pragma on by default, and the reference must stay weak,
/// with no enforcement and no cascade.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Preparing catalog schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS domains (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS assets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            domain_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS assets_domain_id_idx ON assets(domain_id)")
        .execute(pool)
        .await?;

    tracing::info!("Catalog schema ready");
    Ok(())
}
