//! Application state shared across handlers.

use docgate_core::Config;
use sqlx::PgPool;

use crate::services::DocumentService;

pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub documents: DocumentService,
}
