//! Domain models

mod document;

pub use document::{Document, DocumentResponse, DocumentUrlResponse};
