//! Database pool construction and startup migrations.

use anyhow::{Context, Result};
use docgate_core::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

// Metadata queries are small and short-lived; idle connections are not
// worth keeping around for long, and a bounded lifetime keeps the pool
// cycling through fresh connections.
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Build the Postgres pool and bring the `documents` schema up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect(config.database_url())
        .await
        .context("Failed to connect to Postgres")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        acquire_timeout_secs = config.db_timeout_seconds(),
        "Database pool ready"
    );

    // Migrations live at the workspace root so the schema stays next to
    // the crates that share it.
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Schema migrations applied");

    Ok(pool)
}
