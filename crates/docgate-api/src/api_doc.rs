//! OpenAPI document definition.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Docgate API",
        description = "Document metadata and file storage gateway",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        crate::handlers::documents::upload_document,
        crate::handlers::documents::get_document_url,
        crate::handlers::documents::list_documents_by_owner,
        crate::handlers::documents::list_documents_by_application,
        crate::handlers::documents::delete_document,
    ),
    components(schemas(
        docgate_core::models::DocumentResponse,
        docgate_core::models::DocumentUrlResponse,
        crate::error::ErrorResponse,
    )),
    tags((name = "documents", description = "Document upload, retrieval, and deletion"))
)]
pub struct ApiDoc;
