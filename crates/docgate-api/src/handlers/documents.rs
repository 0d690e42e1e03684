use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use docgate_core::models::{DocumentResponse, DocumentUrlResponse};
use docgate_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::documents::UploadRequest;
use crate::state::AppState;

/// Fields extracted from the upload form.
struct UploadForm {
    content: Vec<u8>,
    original_filename: String,
    content_type: String,
    owner_document: String,
    application_id: Uuid,
    document_type: String,
}

/// Extract the `file` part plus the metadata text fields from a multipart
/// form. Exactly one field named "file" is accepted.
async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut content: Option<Vec<u8>> = None;
    let mut original_filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut owner_document: Option<String> = None;
    let mut application_id: Option<Uuid> = None;
    let mut document_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if content.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                original_filename = field.file_name().map(|s: &str| s.to_string());
                content_type = field.content_type().map(|s: &str| s.to_string());

                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                content = Some(data.to_vec());
            }
            "owner_document" => {
                owner_document = Some(field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read owner_document: {}", e))
                })?);
            }
            "application_id" => {
                let raw = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read application_id: {}", e))
                })?;
                application_id = Some(Uuid::parse_str(raw.trim()).map_err(|_| {
                    AppError::InvalidInput("application_id must be a UUID".to_string())
                })?);
            }
            "document_type" => {
                document_type = Some(field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read document_type: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let content = content.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    Ok(UploadForm {
        content,
        original_filename: original_filename.unwrap_or_else(|| "unknown".to_string()),
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        owner_document: owner_document
            .ok_or_else(|| AppError::InvalidInput("owner_document is required".to_string()))?,
        application_id: application_id
            .ok_or_else(|| AppError::InvalidInput("application_id is required".to_string()))?,
        document_type: document_type
            .ok_or_else(|| AppError::InvalidInput("document_type is required".to_string()))?,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document uploaded successfully", body = DocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = extract_upload_form(multipart).await?;

    let file_size = form.content.len() as i64;
    let document = state
        .documents
        .upload(UploadRequest {
            content: form.content,
            original_filename: form.original_filename,
            file_size,
            mime_type: form.content_type,
            owner_document: form.owner_document,
            application_id: form.application_id,
            document_type: form.document_type,
            uploaded_by: user.principal_id(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::from(document)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}/url",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Access URL for the document", body = DocumentUrlResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn get_document_url(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let url = state
        .documents
        .get_url(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;

    Ok(Json(DocumentUrlResponse {
        document_id: id,
        url,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/owner/{owner_document}",
    tag = "documents",
    params(("owner_document" = String, Path, description = "Owner's external document number")),
    responses(
        (status = 200, description = "Documents for the owner, newest first", body = [DocumentResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_documents_by_owner(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(owner_document): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let documents = state.documents.list_by_owner(&owner_document).await?;
    let response: Vec<DocumentResponse> = documents.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/application/{application_id}",
    tag = "documents",
    params(("application_id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 200, description = "Documents for the application, newest first", body = [DocumentResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_documents_by_application(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let documents = state.documents.list_by_application(application_id).await?;
    let response: Vec<DocumentResponse> = documents.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if state.documents.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Document {} not found", id)).into())
    }
}
