//! Route configuration and setup.

use crate::handlers::documents;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use docgate_core::constants::MAX_DOCUMENT_SIZE_BYTES;
use docgate_core::{Config, StorageBackend};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

// Multipart framing adds boundaries and text fields on top of the file
// itself; give the request body some headroom over the file cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let document_routes = Router::new()
        .route("/api/v1/documents", post(documents::upload_document))
        .route("/api/v1/documents/{id}/url", get(documents::get_document_url))
        .route(
            "/api/v1/documents/owner/{owner_document}",
            get(documents::list_documents_by_owner),
        )
        .route(
            "/api/v1/documents/application/{application_id}",
            get(documents::list_documents_by_application),
        )
        .route("/api/v1/documents/{id}", delete(documents::delete_document));

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::ApiDoc::openapi()) }),
        )
        .merge(document_routes);

    // Local backend serves stored files directly; presigned URLs handle
    // this for S3.
    if config.storage_backend().unwrap_or(StorageBackend::Local) == StorageBackend::Local {
        if let Some(path) = config.local_storage_path() {
            app = app.nest_service("/files", ServeDir::new(path));
        }
    }

    let app = app
        .layer(RequestBodyLimitLayer::new(
            MAX_DOCUMENT_SIZE_BYTES as usize + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins().iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Health check: process plus a bounded database ping.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let database =
        match tokio::time::timeout(TIMEOUT, sqlx::query("SELECT 1").execute(&state.pool)).await {
            Ok(Ok(_)) => "healthy".to_string(),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Database health check failed");
                format!("unhealthy: {}", e)
            }
            Err(_) => {
                tracing::error!("Database health check timed out");
                "timeout".to_string()
            }
        };

    let healthy = database == "healthy";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if healthy { "healthy" } else { "degraded" },
            "database": database,
        })),
    )
}
