//! Docgate Storage Library
//!
//! Storage abstraction and backend implementations for Docgate. The
//! `Storage` trait covers the full capability set the orchestrators need
//! (store bytes, produce an access URL, delete, check existence); the
//! `local` and `s3` modules implement it behind cargo features.
//!
//! # Storage path format
//!
//! Every backend addresses objects with the same key layout, generated in
//! the `keys` module: `documents/{YYYY}/{MM}/{filename}`. Keys must not
//! contain `..` or a leading `/`. Outside this crate the key is an opaque
//! token.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use docgate_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
