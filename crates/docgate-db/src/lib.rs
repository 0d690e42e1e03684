//! Database repositories for the data access layer
//!
//! The `documents` repository owns the durable representation of document
//! metadata. "Not found" is represented as absence, never as an error;
//! backing-store failures surface as `AppError::Database`.

pub mod db;

pub use db::documents::{DocumentStore, PgDocumentStore};
