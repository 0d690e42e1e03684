//! Fixed upload policy values.

/// Maximum accepted document size in bytes (10 MiB).
pub const MAX_DOCUMENT_SIZE_BYTES: i64 = 10 * 1024 * 1024;

/// MIME types accepted for upload. Fixed allow-list; anything else is
/// rejected before any backend I/O.
pub const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
];

/// Default lifetime of presigned access URLs, in seconds.
pub const DEFAULT_URL_EXPIRATION_SECS: u64 = 3600;

/// Extension used for stored filenames when the original name carries none.
pub const FALLBACK_EXTENSION: &str = "bin";
