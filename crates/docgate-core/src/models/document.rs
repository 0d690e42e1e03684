use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Metadata record describing one uploaded file and its storage location.
///
/// Documents are immutable once stored: created in memory by the upload
/// orchestrator, persisted exactly once, and removed by the delete
/// orchestrator. `storage_path` is an opaque backend locator; only the
/// storage backend interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Document {
    pub id: Uuid,
    /// External identifier of the uploading individual (not a foreign key).
    pub owner_document: String,
    pub application_id: Uuid,
    /// Name assigned at upload time; collision-resistant via the embedded id.
    pub stored_filename: String,
    /// Client-supplied name, kept for display only.
    pub original_filename: String,
    pub storage_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub document_type: String,
    pub uploaded_at: DateTime<Utc>,
    /// Acting principal; absent for system-initiated uploads.
    pub uploaded_by: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub owner_document: String,
    pub application_id: Uuid,
    pub stored_filename: String,
    pub original_filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub document_type: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<Uuid>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            owner_document: doc.owner_document,
            application_id: doc.application_id,
            stored_filename: doc.stored_filename,
            original_filename: doc.original_filename,
            file_size: doc.file_size,
            mime_type: doc.mime_type,
            document_type: doc.document_type,
            uploaded_at: doc.uploaded_at,
            uploaded_by: doc.uploaded_by,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentUrlResponse {
    pub document_id: Uuid,
    pub url: String,
}
