//! HTTP handlers.

pub mod documents;
