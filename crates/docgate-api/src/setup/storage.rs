//! Storage setup and initialization

use anyhow::Result;
use docgate_core::Config;
use docgate_storage::{create_storage, Storage};
use std::sync::Arc;

/// Setup the storage backend selected by configuration.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}
