//! Repository implementations.

pub mod documents;
