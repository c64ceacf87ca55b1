//! Database schema and migrations
//!
//! Migrations are embedded SQL files, each applied once inside its own
//! transaction and recorded in `schema_migrations`. Connection pragmas
//! (WAL, foreign keys) belong to the pool options in `database::connect_options`.

use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// Embedded migrations, in the order they must be applied
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("migrations/001_initial_schema.sql"))];

/// Bring the schema up to the latest migration
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(pool)
            .await?;

    let pending: Vec<_> = MIGRATIONS
        .iter()
        .filter(|(version, _)| *version > current)
        .collect();

    if pending.is_empty() {
        tracing::debug!("Database schema is current at version {}", current);
        return Ok(());
    }

    for &(version, sql) in pending {
        let mut tx = pool.begin().await?;

        sqlx::raw_sql(sql).execute(&mut *tx).await?;

        sqlx::query("INSERT INTO schema_migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Applied schema migration {}", version);
    }

    Ok(())
}
