use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let region_provider = RegionProviderChain::first_try(aws_config::Region::new(region));

        let retry_config = RetryConfig::standard()
            .with_max_attempts(5)
            .with_retry_mode(RetryMode::Adaptive);

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(retry_config.clone())
            .load()
            .await;

        let client = if let Some(ref endpoint) = endpoint_url {
            // S3-compatible providers need a custom endpoint and path-style addressing
            let mut s3_config_builder = aws_sdk_s3::Config::builder()
                .endpoint_url(endpoint)
                .region(config.region().cloned())
                .retry_config(retry_config);
            if let Some(provider) = config.credentials_provider().into_iter().next() {
                s3_config_builder = s3_config_builder.credentials_provider(provider);
            }
            s3_config_builder = s3_config_builder.force_path_style(true);

            Client::from_conf(s3_config_builder.build())
        } else {
            Client::new(&config)
        };

        Ok(S3Storage { client, bucket })
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn store(
        &self,
        content: Vec<u8>,
        filename: &str,
        content_type: &str,
        uploaded_at: DateTime<Utc>,
    ) -> StorageResult<String> {
        let key = crate::keys::generate_storage_key(uploaded_at, filename);
        let size = content.len() as u64;

        let body = ByteStream::from(Bytes::from(content));

        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 write failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 write successful"
        );

        Ok(key)
    }

    async fn url_for(&self, storage_path: &str, expires_in: Duration) -> StorageResult<String> {
        let presigning_config = aws_sdk_s3::presigning::PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        let presigned_request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(storage_path)
            .presigned(presigning_config)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        Ok(presigned_request.uri().to_string())
    }

    async fn delete(&self, storage_path: &str) -> StorageResult<bool> {
        let start = std::time::Instant::now();

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(storage_path)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_path,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                StorageError::DeleteFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        // delete-object is idempotent; S3 does not report whether the key existed
        Ok(true)
    }

    async fn exists(&self, storage_path: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(storage_path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    HeadObjectError::NotFound(_) => Ok(false),
                    _ => Err(StorageError::BackendError(e.to_string())),
                },
                _ => Err(StorageError::BackendError(e.to_string())),
            },
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
