//! Docgate Core Library
//!
//! Domain models, configuration, error types, and upload validation shared
//! across all Docgate components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
