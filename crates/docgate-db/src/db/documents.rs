use async_trait::async_trait;
use docgate_core::models::Document;
use docgate_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Metadata store contract for document records.
///
/// `save` is append-only: documents are immutable once stored, so there is
/// no update operation. List results are ordered newest first by
/// `uploaded_at`. Lookups represent "not found" as `None`/`false`, never
/// as an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save(&self, document: Document) -> Result<Document, AppError>;

    async fn find_by_id(&self, document_id: Uuid) -> Result<Option<Document>, AppError>;

    async fn find_by_owner(&self, owner_document: &str) -> Result<Vec<Document>, AppError>;

    async fn find_by_application(&self, application_id: Uuid) -> Result<Vec<Document>, AppError>;

    /// Delete the row; returns whether a row was removed.
    async fn delete(&self, document_id: Uuid) -> Result<bool, AppError>;

    /// Presence check for callers that need no row data.
    async fn exists_by_id(&self, document_id: Uuid) -> Result<bool, AppError>;
}

/// Postgres-backed document store.
///
/// Holds a bounded connection pool; connections are acquired per call and
/// never held across storage I/O.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[tracing::instrument(
        skip(self, document),
        fields(db.table = "documents", db.operation = "insert", document_id = %document.id)
    )]
    async fn save(&self, document: Document) -> Result<Document, AppError> {
        let row: Document = sqlx::query_as::<Postgres, Document>(
            r#"
            INSERT INTO documents (
                id, owner_document, application_id,
                stored_filename, original_filename, storage_path,
                file_size, mime_type, document_type,
                uploaded_at, uploaded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(document.id)
        .bind(&document.owner_document)
        .bind(document.application_id)
        .bind(&document.stored_filename)
        .bind(&document.original_filename)
        .bind(&document.storage_path)
        .bind(document.file_size)
        .bind(&document.mime_type)
        .bind(&document.document_type)
        .bind(document.uploaded_at)
        .bind(document.uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "select")
    )]
    async fn find_by_id(&self, document_id: Uuid) -> Result<Option<Document>, AppError> {
        let row: Option<Document> = sqlx::query_as::<Postgres, Document>(
            "SELECT * FROM documents WHERE id = $1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "select")
    )]
    async fn find_by_owner(&self, owner_document: &str) -> Result<Vec<Document>, AppError> {
        let rows: Vec<Document> = sqlx::query_as::<Postgres, Document>(
            r#"
            SELECT * FROM documents
            WHERE owner_document = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(owner_document)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "select")
    )]
    async fn find_by_application(&self, application_id: Uuid) -> Result<Vec<Document>, AppError> {
        let rows: Vec<Document> = sqlx::query_as::<Postgres, Document>(
            r#"
            SELECT * FROM documents
            WHERE application_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "delete")
    )]
    async fn delete(&self, document_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "select")
    )]
    async fn exists_by_id(&self, document_id: Uuid) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM documents WHERE id = $1)")
                .bind(document_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
