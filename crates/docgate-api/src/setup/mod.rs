//! Application setup and initialization
//!
//! All initialization logic lives here rather than in main.rs.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::services::DocumentService;
use crate::state::AppState;
use anyhow::Result;
use docgate_core::Config;
use docgate_db::PgDocumentStore;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry();

    tracing::info!(environment = %config.environment(), "Configuration loaded");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let documents = DocumentService::new(
        Arc::new(PgDocumentStore::new(pool.clone())),
        storage,
        Duration::from_secs(config.url_expiration_secs()),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        pool,
        documents,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
