//! Document use-case orchestration.
//!
//! `DocumentService` composes the storage backend and the metadata store
//! into the upload, delete, and query operations. The two backends never
//! see each other; this service owns the cross-backend failure policy:
//!
//! - **Upload** is a two-phase write (storage first, then metadata) with
//!   no compensating transaction. A metadata failure after a successful
//!   storage write leaves an orphaned object; it is logged at error level
//!   with the storage path so a reconciliation sweep can collect it.
//! - **Delete** treats storage cleanup as best effort: a failing storage
//!   delete is logged and swallowed so metadata removal always proceeds.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use docgate_core::models::Document;
use docgate_core::{validation, AppError};
use docgate_db::DocumentStore;
use docgate_storage::Storage;
use uuid::Uuid;

/// Parameters for a document upload.
pub struct UploadRequest {
    pub content: Vec<u8>,
    pub original_filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub owner_document: String,
    pub application_id: Uuid,
    pub document_type: String,
    pub uploaded_by: Option<Uuid>,
}

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    storage: Arc<dyn Storage>,
    url_expiration: Duration,
}

impl DocumentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn Storage>,
        url_expiration: Duration,
    ) -> Self {
        Self {
            store,
            storage,
            url_expiration,
        }
    }

    /// Upload a document: validate, write bytes, persist metadata.
    ///
    /// Validation rejects before any backend I/O. A storage failure aborts
    /// the whole operation with no metadata written. A metadata failure
    /// after the storage write is propagated; the stored object is left
    /// behind and logged for cleanup.
    #[tracing::instrument(
        skip(self, request),
        fields(
            owner_document = %request.owner_document,
            application_id = %request.application_id,
            document_type = %request.document_type,
            file_size = request.file_size,
        )
    )]
    pub async fn upload(&self, request: UploadRequest) -> Result<Document, AppError> {
        validation::validate_file_size(request.file_size)?;
        validation::validate_content_type(&request.mime_type)?;

        let id = Uuid::new_v4();
        let uploaded_at = Utc::now();
        let stored_filename = validation::stored_filename(
            &request.document_type,
            &request.original_filename,
            id,
            uploaded_at,
        );

        let storage_path = self
            .storage
            .store(
                request.content,
                &stored_filename,
                &request.mime_type,
                uploaded_at,
            )
            .await
            .map_err(|e| {
                AppError::Storage(format!("Upload of document {} failed: {}", id, e))
            })?;

        let document = Document {
            id,
            owner_document: request.owner_document,
            application_id: request.application_id,
            stored_filename,
            original_filename: request.original_filename,
            storage_path,
            file_size: request.file_size,
            mime_type: request.mime_type,
            document_type: request.document_type,
            uploaded_at,
            uploaded_by: request.uploaded_by,
        };

        match self.store.save(document).await {
            Ok(saved) => {
                tracing::info!(document_id = %saved.id, storage_path = %saved.storage_path, "Document uploaded");
                Ok(saved)
            }
            Err(e) => {
                // No compensating delete: the object stays for the
                // reconciliation sweep to collect.
                tracing::error!(
                    document_id = %id,
                    error = %e,
                    "Metadata save failed after storage write; stored object orphaned"
                );
                Err(e)
            }
        }
    }

    /// Delete a document's bytes (best effort) and its metadata row.
    ///
    /// Returns `false` when no document with that id exists. A storage
    /// delete failure never blocks metadata removal.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, document_id: Uuid) -> Result<bool, AppError> {
        let Some(document) = self.store.find_by_id(document_id).await? else {
            return Ok(false);
        };

        match self.storage.delete(&document.storage_path).await {
            Ok(removed) => {
                tracing::debug!(document_id = %document_id, removed, "Stored bytes deleted");
            }
            Err(e) => {
                tracing::warn!(
                    document_id = %document_id,
                    storage_path = %document.storage_path,
                    error = %e,
                    "Storage delete failed; removing metadata anyway"
                );
            }
        }

        self.store.delete(document_id).await
    }

    /// Time-limited access URL for a document, or `None` when absent.
    #[tracing::instrument(skip(self))]
    pub async fn get_url(&self, document_id: Uuid) -> Result<Option<String>, AppError> {
        let Some(document) = self.store.find_by_id(document_id).await? else {
            return Ok(None);
        };

        let url = self
            .storage
            .url_for(&document.storage_path, self.url_expiration)
            .await
            .map_err(|e| {
                AppError::Storage(format!("URL issuance for document {} failed: {}", document_id, e))
            })?;

        Ok(Some(url))
    }

    /// Documents for one owner, newest first.
    pub async fn list_by_owner(&self, owner_document: &str) -> Result<Vec<Document>, AppError> {
        self.store.find_by_owner(owner_document).await
    }

    /// Documents for one application, newest first.
    pub async fn list_by_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<Document>, AppError> {
        self.store.find_by_application(application_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone};
    use docgate_core::StorageBackend;
    use docgate_storage::{StorageError, StorageResult};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory storage double with switchable failure modes.
    #[derive(Default)]
    struct MockStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
        fail_store: bool,
        fail_delete: bool,
    }

    #[async_trait]
    impl Storage for MockStorage {
        async fn store(
            &self,
            content: Vec<u8>,
            filename: &str,
            _content_type: &str,
            uploaded_at: DateTime<Utc>,
        ) -> StorageResult<String> {
            if self.fail_store {
                return Err(StorageError::UploadFailed("injected".to_string()));
            }
            let key = format!(
                "documents/{}/{}",
                uploaded_at.format("%Y/%m"),
                filename
            );
            self.files.lock().unwrap().insert(key.clone(), content);
            Ok(key)
        }

        async fn url_for(
            &self,
            storage_path: &str,
            _expires_in: Duration,
        ) -> StorageResult<String> {
            if !self.files.lock().unwrap().contains_key(storage_path) {
                return Err(StorageError::NotFound(storage_path.to_string()));
            }
            Ok(format!("http://storage.test/{}", storage_path))
        }

        async fn delete(&self, storage_path: &str) -> StorageResult<bool> {
            if self.fail_delete {
                return Err(StorageError::DeleteFailed("injected".to_string()));
            }
            Ok(self.files.lock().unwrap().remove(storage_path).is_some())
        }

        async fn exists(&self, storage_path: &str) -> StorageResult<bool> {
            Ok(self.files.lock().unwrap().contains_key(storage_path))
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    /// In-memory metadata store double honoring the ordering contract.
    #[derive(Default)]
    struct MockStore {
        docs: Mutex<Vec<Document>>,
        fail_save: bool,
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn save(&self, document: Document) -> Result<Document, AppError> {
            if self.fail_save {
                return Err(AppError::Internal("injected save failure".to_string()));
            }
            self.docs.lock().unwrap().push(document.clone());
            Ok(document)
        }

        async fn find_by_id(&self, document_id: Uuid) -> Result<Option<Document>, AppError> {
            Ok(self
                .docs
                .lock()
                .unwrap()
                .iter()
                .find(|d| d.id == document_id)
                .cloned())
        }

        async fn find_by_owner(&self, owner_document: &str) -> Result<Vec<Document>, AppError> {
            let mut out: Vec<Document> = self
                .docs
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.owner_document == owner_document)
                .cloned()
                .collect();
            out.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
            Ok(out)
        }

        async fn find_by_application(
            &self,
            application_id: Uuid,
        ) -> Result<Vec<Document>, AppError> {
            let mut out: Vec<Document> = self
                .docs
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.application_id == application_id)
                .cloned()
                .collect();
            out.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
            Ok(out)
        }

        async fn delete(&self, document_id: Uuid) -> Result<bool, AppError> {
            let mut docs = self.docs.lock().unwrap();
            let before = docs.len();
            docs.retain(|d| d.id != document_id);
            Ok(docs.len() < before)
        }

        async fn exists_by_id(&self, document_id: Uuid) -> Result<bool, AppError> {
            Ok(self
                .docs
                .lock()
                .unwrap()
                .iter()
                .any(|d| d.id == document_id))
        }
    }

    fn service(store: Arc<MockStore>, storage: Arc<MockStorage>) -> DocumentService {
        DocumentService::new(store, storage, Duration::from_secs(3600))
    }

    fn pdf_request(content: Vec<u8>) -> UploadRequest {
        let file_size = content.len() as i64;
        UploadRequest {
            content,
            original_filename: "Resume.pdf".to_string(),
            file_size,
            mime_type: "application/pdf".to_string(),
            owner_document: "1234567890".to_string(),
            application_id: Uuid::new_v4(),
            document_type: "cv".to_string(),
            uploaded_by: Some(Uuid::new_v4()),
        }
    }

    fn seeded_document(owner: &str, application_id: Uuid, uploaded_at: DateTime<Utc>) -> Document {
        Document {
            id: Uuid::new_v4(),
            owner_document: owner.to_string(),
            application_id,
            stored_filename: "cv_x.pdf".to_string(),
            original_filename: "x.pdf".to_string(),
            storage_path: format!("documents/2025/01/{}", Uuid::new_v4()),
            file_size: 42,
            mime_type: "application/pdf".to_string(),
            document_type: "cv".to_string(),
            uploaded_at,
            uploaded_by: None,
        }
    }

    #[tokio::test]
    async fn test_upload_round_trip() {
        let store = Arc::new(MockStore::default());
        let storage = Arc::new(MockStorage::default());
        let svc = service(store.clone(), storage.clone());

        let content = vec![0u8; 512_000];
        let doc = svc.upload(pdf_request(content.clone())).await.unwrap();

        assert_eq!(doc.file_size, 512_000);
        assert!(doc.stored_filename.starts_with("cv_"));
        assert!(doc.stored_filename.ends_with(".pdf"));
        assert!(store.exists_by_id(doc.id).await.unwrap());
        assert!(storage.exists(&doc.storage_path).await.unwrap());
        assert_eq!(
            storage.files.lock().unwrap().get(&doc.storage_path),
            Some(&content)
        );

        let url = svc.get_url(doc.id).await.unwrap();
        assert_eq!(url, Some(format!("http://storage.test/{}", doc.storage_path)));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversize_before_any_io() {
        let store = Arc::new(MockStore::default());
        let storage = Arc::new(MockStorage::default());
        let svc = service(store.clone(), storage.clone());

        let mut request = pdf_request(vec![0u8; 16]);
        request.file_size = 10 * 1024 * 1024 + 1;

        let err = svc.upload(request).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert!(storage.files.lock().unwrap().is_empty());
        assert!(store.docs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_mime() {
        let store = Arc::new(MockStore::default());
        let storage = Arc::new(MockStorage::default());
        let svc = service(store.clone(), storage.clone());

        let mut request = pdf_request(vec![1, 2, 3]);
        request.mime_type = "application/zip".to_string();

        let err = svc.upload(request).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(storage.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_storage_failure_persists_nothing() {
        let store = Arc::new(MockStore::default());
        let storage = Arc::new(MockStorage {
            fail_store: true,
            ..Default::default()
        });
        let svc = service(store.clone(), storage);

        let err = svc.upload(pdf_request(vec![1, 2, 3])).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(store.docs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_metadata_failure_leaves_orphan() {
        let store = Arc::new(MockStore {
            fail_save: true,
            ..Default::default()
        });
        let storage = Arc::new(MockStorage::default());
        let svc = service(store.clone(), storage.clone());

        let err = svc.upload(pdf_request(vec![9u8; 100])).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        // The stored object remains (documented orphan), but no metadata
        // row exists for any id.
        assert_eq!(storage.files.lock().unwrap().len(), 1);
        assert!(store.docs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_returns_false_without_side_effects() {
        let store = Arc::new(MockStore::default());
        let storage = Arc::new(MockStorage::default());
        let svc = service(store, storage.clone());

        let id = Uuid::new_v4();
        assert!(!svc.delete(id).await.unwrap());
        assert!(!svc.delete(id).await.unwrap());
        assert!(storage.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_tolerates_storage_failure() {
        let store = Arc::new(MockStore::default());
        let storage = Arc::new(MockStorage {
            fail_delete: true,
            ..Default::default()
        });
        let svc = service(store.clone(), storage);

        let doc = svc.upload(pdf_request(vec![5u8; 10])).await.unwrap();

        assert!(svc.delete(doc.id).await.unwrap());
        assert!(store.find_by_id(doc.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_bytes_and_metadata() {
        let store = Arc::new(MockStore::default());
        let storage = Arc::new(MockStorage::default());
        let svc = service(store.clone(), storage.clone());

        let doc = svc.upload(pdf_request(vec![5u8; 10])).await.unwrap();
        assert!(svc.delete(doc.id).await.unwrap());
        assert!(storage.files.lock().unwrap().is_empty());
        assert!(!store.exists_by_id(doc.id).await.unwrap());
        assert!(svc.get_url(doc.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_url_absent_document() {
        let store = Arc::new(MockStore::default());
        let storage = Arc::new(MockStorage::default());
        let svc = service(store, storage);

        assert_eq!(svc.get_url(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_listings_are_newest_first() {
        let store = Arc::new(MockStore::default());
        let storage = Arc::new(MockStorage::default());
        let svc = service(store.clone(), storage);

        let application_id = Uuid::new_v4();
        let t1 = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 1, 1, 11, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        for at in [t1, t2, t3] {
            store
                .save(seeded_document("1234567890", application_id, at))
                .await
                .unwrap();
        }

        let by_owner = svc.list_by_owner("1234567890").await.unwrap();
        let times: Vec<_> = by_owner.iter().map(|d| d.uploaded_at).collect();
        assert_eq!(times, vec![t3, t2, t1]);

        let by_app = svc.list_by_application(application_id).await.unwrap();
        assert_eq!(by_app.len(), 3);
        assert_eq!(by_app[0].uploaded_at, t3);
    }
}
