//! Configuration module
//!
//! Environment-driven application configuration: server, database pool,
//! JWT, and storage backend selection. Required keys (`DATABASE_URL`,
//! `JWT_SECRET`) fail fast at startup; everything else has a default.

use std::env;
use std::str::FromStr;

use crate::constants::DEFAULT_URL_EXPIRATION_SECS;
use crate::storage_types::StorageBackend;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    cors_origins: Vec<String>,
    environment: String,
    database_url: String,
    db_max_connections: u32,
    db_timeout_seconds: u64,
    jwt_secret: String,
    storage_backend: Option<StorageBackend>,
    s3_bucket: Option<String>,
    s3_region: Option<String>,
    s3_endpoint: Option<String>,
    aws_region: Option<String>,
    local_storage_path: Option<String>,
    local_storage_base_url: Option<String>,
    url_expiration_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .map(|s| StorageBackend::from_str(&s))
            .transpose()
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8003".to_string())
                .parse()
                .unwrap_or(8003),
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            url_expiration_secs: env::var("URL_EXPIRATION_SECS")
                .unwrap_or_else(|_| DEFAULT_URL_EXPIRATION_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_URL_EXPIRATION_SECS),
        })
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn url_expiration_secs(&self) -> u64 {
        self.url_expiration_secs
    }
}
