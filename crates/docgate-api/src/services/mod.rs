//! Use-case services.

pub mod documents;

pub use documents::DocumentService;
